use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, ValueEnum};

use pinhole::camera::{Camera, FovModel, Intrinsics, SensorModel};
use pinhole::math::{Mat4, Vec3, Vec3i};
use pinhole::render::Renderer;
use pinhole::scene::Scene;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Trace => write!(f, "trace"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Error => write!(f, "error"),
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CameraKind {
    /// Physical film back and focal length
    Sensor,
    /// Vertical field of view
    Fov,
}

#[derive(Parser, Debug)]
#[command(name = "pinhole")]
#[command(version)]
#[command(about = "Render triangles through a pinhole camera into a PPM image")]
struct Cli {
    /// Image width in pixels
    #[arg(long, default_value_t = 512)]
    width: u32,

    /// Image height in pixels
    #[arg(long, default_value_t = 512)]
    height: u32,

    /// Output path; `.ppm` writes plain-text P3, other extensions go through the image encoder
    #[arg(short, long, default_value = "output.ppm")]
    output: PathBuf,

    /// Intrinsic camera model
    #[arg(long, value_enum, default_value = "sensor")]
    camera: CameraKind,

    /// Focal length in millimetres (sensor model)
    #[arg(long, default_value_t = 35.0)]
    focal_length: f32,

    /// Vertical field of view in degrees (fov model)
    #[arg(long, default_value_t = 90.0)]
    fov: f32,

    /// Near clipping plane distance (defaults to the model's own)
    #[arg(long)]
    near: Option<f32>,

    /// Far clipping plane distance (defaults to the model's own)
    #[arg(long)]
    far: Option<f32>,

    /// Skip matching the film aspect ratio to the image aspect ratio
    #[arg(long)]
    no_aspect_rescale: bool,

    /// Camera position as "x,y,z"; the camera stays at the origin when omitted
    #[arg(long, value_parser = parse_vec3, allow_hyphen_values = true)]
    eye: Option<Vec3>,

    /// Point the camera looks at, as "x,y,z"
    #[arg(long, value_parser = parse_vec3, allow_hyphen_values = true, default_value = "0,0,-5")]
    target: Vec3,

    /// Render this OBJ file instead of the built-in scene
    #[arg(long)]
    obj: Option<PathBuf>,

    /// Background color as "r,g,b"
    #[arg(long, value_parser = parse_color, default_value = "0,0,0")]
    background: Vec3i,

    /// Set logging level; RUST_LOG takes precedence
    #[arg(long, value_name = "LEVEL", default_value_t = LogLevel::Info)]
    log_level: LogLevel,
}

fn parse_components<const N: usize, T: std::str::FromStr>(s: &str) -> Result<[T; N], String> {
    let parts: Vec<T> = s
        .split(',')
        .map(|part| {
            part.trim()
                .parse()
                .map_err(|_| format!("invalid component '{}' in '{s}'", part.trim()))
        })
        .collect::<Result<_, _>>()?;
    let count = parts.len();
    parts
        .try_into()
        .map_err(|_| format!("expected {N} comma-separated values, got {count}"))
}

fn parse_vec3(s: &str) -> Result<Vec3, String> {
    let [x, y, z] = parse_components::<3, f32>(s)?;
    Ok(Vec3::new(x, y, z))
}

fn parse_color(s: &str) -> Result<Vec3i, String> {
    let [r, g, b] = parse_components::<3, i32>(s)?;
    Ok(Vec3i::new(r, g, b))
}

fn intrinsics(cli: &Cli) -> Intrinsics {
    match cli.camera {
        CameraKind::Sensor => {
            let defaults = SensorModel::default();
            Intrinsics::Sensor(SensorModel {
                focal_length: cli.focal_length,
                near: cli.near.unwrap_or(defaults.near),
                far: cli.far.unwrap_or(defaults.far),
                ..defaults
            })
        }
        CameraKind::Fov => {
            let defaults = FovModel::default();
            Intrinsics::Fov(FovModel {
                fov_y: cli.fov,
                near: cli.near.unwrap_or(defaults.near),
                far: cli.far.unwrap_or(defaults.far),
            })
        }
    }
}

fn is_ppm(path: &Path) -> bool {
    path.extension()
        .map_or(true, |ext| ext.eq_ignore_ascii_case("ppm"))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(cli.log_level.to_string()),
    )
    .init();

    let mut camera = Camera::new(intrinsics(&cli), cli.width, cli.height)
        .context("invalid camera configuration")?;
    if !cli.no_aspect_rescale {
        camera.rescale_aspect_ratio();
    }
    if let Some(eye) = cli.eye {
        camera
            .set_camera_to_world(Mat4::look_at(eye, cli.target, Vec3::new(0.0, 1.0, 0.0)))
            .context("cannot place camera")?;
    }

    let scene = match &cli.obj {
        Some(path) => Scene::from_obj(path)?,
        None => Scene::demo(),
    };

    let renderer = Renderer::new().with_clear_color(cli.background);
    let (frame, stats) = renderer.render(&camera, &scene);
    log::debug!("{stats:?}");

    if is_ppm(&cli.output) {
        pinhole::ppm::save(&cli.output, &frame)
            .with_context(|| format!("failed to write {}", cli.output.display()))?;
    } else {
        frame
            .to_rgb_image()
            .save(&cli.output)
            .with_context(|| format!("failed to write {}", cli.output.display()))?;
        log::info!("wrote {}", cli.output.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_vectors_and_colors() {
        assert_eq!(parse_vec3("1, 2.5,-3").unwrap(), Vec3::new(1.0, 2.5, -3.0));
        assert_eq!(parse_color("10,20,30").unwrap(), Vec3i::new(10, 20, 30));
        assert!(parse_vec3("1,2").is_err());
        assert!(parse_color("1,2,x").is_err());
    }

    #[test]
    fn cli_defaults_match_reference_render() {
        let cli = Cli::parse_from(["pinhole"]);
        assert_eq!((cli.width, cli.height), (512, 512));
        assert_eq!(cli.output, PathBuf::from("output.ppm"));
        assert!(matches!(
            intrinsics(&cli),
            Intrinsics::Sensor(SensorModel {
                focal_length, ..
            }) if focal_length == 35.0
        ));
    }

    #[test]
    fn output_format_follows_extension() {
        assert!(is_ppm(Path::new("out.PPM")));
        assert!(is_ppm(Path::new("out")));
        assert!(!is_ppm(Path::new("out.png")));
    }
}
