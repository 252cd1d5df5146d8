use std::{
    fs, io,
    path::{Path, PathBuf},
};

use anyhow::{Context, Error};
use clap::{Args, Parser, Subcommand};
use log::info;

use phong::{
    material::{self, PRESETS},
    render::Renderer,
    scene::SceneConfig,
    viewer::Viewer,
};

#[derive(Parser, Debug)]
#[command(version, about = "Render a Phong shaded sphere")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a single material to an image.
    Render {
        /// The material to render, 1 through 5.
        #[arg(short, long, default_value_t = 1, value_parser = clap::value_parser!(u8).range(1..=5))]
        material: u8,

        /// The image to write.
        #[arg(short, long, default_value = "sphere.png")]
        output: PathBuf,

        #[command(flatten)]
        scene: SceneArgs,
    },

    /// Render every material, one image each.
    Gallery {
        /// The directory to write images into.
        #[arg(short, long, default_value = ".")]
        dir: PathBuf,

        #[command(flatten)]
        scene: SceneArgs,
    },

    /// Read keys from stdin and re-render on every material change: `1`-`5` select a material,
    /// `q` quits.
    View {
        /// The image rewritten on every change.
        #[arg(short, long, default_value = "sphere.png")]
        output: PathBuf,

        /// Also print an ascii preview this many columns wide.
        #[arg(long)]
        ascii: Option<u32>,

        #[command(flatten)]
        scene: SceneArgs,
    },
}

#[derive(Args, Debug)]
struct SceneArgs {
    /// Canvas width in pixels.
    #[arg(long, default_value_t = 800, value_parser = clap::value_parser!(u32).range(1..))]
    width: u32,

    /// Canvas height in pixels.
    #[arg(long, default_value_t = 600, value_parser = clap::value_parser!(u32).range(1..))]
    height: u32,

    /// Sphere radius in pixels.
    #[arg(long, default_value_t = 200, value_parser = clap::value_parser!(i32).range(1..))]
    radius: i32,

    /// Number of render threads. Defaults to the number of cpus.
    #[arg(short, long)]
    jobs: Option<usize>,
}

impl SceneArgs {
    fn scene(&self) -> SceneConfig {
        SceneConfig::default()
            .with_size(self.width, self.height)
            .with_radius(self.radius)
    }

    fn jobs(&self) -> usize {
        self.jobs.unwrap_or_else(num_cpus::get)
    }
}

fn main() -> Result<(), Error> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let cli = Cli::parse();

    match cli.command {
        Command::Render {
            material: index,
            output,
            scene,
        } => {
            let renderer = Renderer::new(scene.scene()).with_jobs(scene.jobs());
            let material = material::preset(index as usize - 1);
            renderer.render(material).save(&output)?;
            info!("wrote {} to {}", material.name, output.display());
        }

        Command::Gallery { dir, scene } => {
            fs::create_dir_all(&dir)
                .with_context(|| format!("failed to create `{}`", dir.display()))?;
            let renderer = Renderer::new(scene.scene()).with_jobs(scene.jobs());
            let mut canvas = renderer.new_canvas();
            for (i, material) in PRESETS.iter().enumerate() {
                let path = dir.join(format!("{}-{}.png", i + 1, material.slug()));
                renderer.render_into(material, &mut canvas);
                canvas.save(&path)?;
                info!("wrote {} to {}", material.name, path.display());
            }
        }

        Command::View {
            output,
            ascii,
            scene,
        } => view(Viewer::new(scene.scene(), scene.jobs()), &output, ascii)?,
    }

    Ok(())
}

/// Present the viewer's canvas: rewrite the image, and print the preview when asked for one.
fn present(viewer: &Viewer, output: &Path, ascii: Option<u32>) -> Result<(), Error> {
    viewer.canvas().save(output)?;
    if let Some(cols) = ascii {
        println!("{}\n{}", viewer.title(), viewer.canvas().to_ascii(cols));
    }
    Ok(())
}

fn view(mut viewer: Viewer, output: &Path, ascii: Option<u32>) -> Result<(), Error> {
    info!("{}", viewer.title());
    present(&viewer, output, ascii)?;

    viewer.run(io::stdin().lock(), |viewer| present(viewer, output, ascii))
}
