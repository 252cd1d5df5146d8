use std::io::BufRead;

use anyhow::{Context, Error};
use log::{info, warn};

use crate::{
    canvas::Canvas,
    material::{self, Material, NUM_PRESETS},
    render::Renderer,
    scene::SceneConfig,
};

/// The prefix of every window title.
pub const TITLE: &str = "Phong Reflection Model";

/// Input delivered by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// One of the number keys.
    Digit(u8),
    Quit,
    Other(char),
}

impl Key {
    pub fn from_char(c: char) -> Self {
        match c {
            '0'..='9' => Key::Digit(c as u8 - b'0'),
            'q' | 'Q' | '\x1b' => Key::Quit,
            c => Key::Other(c),
        }
    }

    /// The material index bound to this key, if any: `1` through `5` select the presets.
    pub fn material_index(&self) -> Option<usize> {
        match *self {
            Key::Digit(d) if d >= 1 && (d as usize) <= NUM_PRESETS => Some(d as usize - 1),
            _ => None,
        }
    }
}

/// The currently selected material.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Selection(usize);

impl Selection {
    pub fn new() -> Self {
        Self(0)
    }

    pub fn index(&self) -> usize {
        self.0
    }

    pub fn material(&self) -> &'static Material {
        material::preset(self.0)
    }

    /// Select the material at `index`, returning `true` when the selection changed.
    pub fn select(&mut self, index: usize) -> bool {
        assert!(index < NUM_PRESETS, "material index {} out of range", index);
        let changed = self.0 != index;
        self.0 = index;
        changed
    }
}

/// What the host should do after a key was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Response {
    /// The canvas and title changed and need presenting.
    Redraw,

    /// Nothing changed.
    Unchanged,

    Quit,
}

/// The state behind the window: the selection and the canvas showing it.
pub struct Viewer {
    renderer: Renderer,
    selection: Selection,
    canvas: Canvas,
}

impl Viewer {
    /// Construct a viewer with the first material selected and already rendered.
    pub fn new(scene: SceneConfig, jobs: usize) -> Self {
        let renderer = Renderer::new(scene).with_jobs(jobs);
        let selection = Selection::new();
        let canvas = renderer.render(selection.material());
        Self {
            renderer,
            selection,
            canvas,
        }
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn title(&self) -> String {
        format!("{}: {}", TITLE, self.selection.material().name)
    }

    /// Handle a key, re-rendering only when it selects a different material.
    pub fn handle(&mut self, key: Key) -> Response {
        if key == Key::Quit {
            return Response::Quit;
        }

        let Some(index) = key.material_index() else {
            warn!("ignoring key {:?}", key);
            return Response::Unchanged;
        };

        if !self.selection.select(index) {
            return Response::Unchanged;
        }

        self.renderer
            .render_into(self.selection.material(), &mut self.canvas);
        info!("{}", self.title());

        Response::Redraw
    }

    /// Feed every non-whitespace character of `input` through [`Viewer::handle`], calling
    /// `present` after each redraw. Stops at a quit key or the end of the input.
    pub fn run<F>(&mut self, input: impl BufRead, mut present: F) -> Result<(), Error>
    where
        F: FnMut(&Viewer) -> Result<(), Error>,
    {
        for line in input.lines() {
            let line = line.context("failed to read keys")?;
            for c in line.chars().filter(|c| !c.is_whitespace()) {
                match self.handle(Key::from_char(c)) {
                    Response::Redraw => present(self)?,
                    Response::Unchanged => (),
                    Response::Quit => return Ok(()),
                }
            }
        }

        Ok(())
    }
}
