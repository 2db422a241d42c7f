use std::path::PathBuf;

use clap::Parser;
use ripple_brush::cli::Cli;
use ripple_brush::config::SketchConfig;
use ripple_brush::core::clock::TimeMode;
use ripple_brush::core::driver::Route;

fn temp_config(name: &str, json: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("ripple-brush-{}-{}.json", name, std::process::id()));
    std::fs::write(&path, json).unwrap();
    path
}

#[cfg(test)]
mod json_tests {
    use super::*;

    #[test]
    fn test_missing_fields_take_defaults() {
        let config = SketchConfig::from_json_str(
            r#"{ "brush": { "pool_size": 10 }, "time_mode": "accumulating" }"#,
        )
        .unwrap();

        assert_eq!(config.brush.pool_size, 10);
        assert_eq!(config.brush.opacity_decay, 0.96);
        assert_eq!(config.time_mode, TimeMode::Accumulating);
        assert_eq!(config.pointer_threshold, 4.0);
        assert_eq!(config.width, 800);
    }

    #[test]
    fn test_empty_object_is_default() {
        assert_eq!(SketchConfig::from_json_str("{}").unwrap(), SketchConfig::default());
    }

    #[test]
    fn test_serialized_config_reads_back() {
        let mut config = SketchConfig::default();
        config.seed = Some(99);
        config.brush_texture = Some(PathBuf::from("assets/brush.png"));

        let json = config.to_json_string().unwrap();
        assert_eq!(SketchConfig::from_json_str(&json).unwrap(), config);
    }

    #[test]
    fn test_malformed_json_rejected() {
        assert!(SketchConfig::from_json_str("{ brush: ").is_err());
        assert!(SketchConfig::from_json_str(r#"{ "time_mode": "sideways" }"#).is_err());
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(SketchConfig::from_json_str(r#"{ "brush": { "opacity_decay": 1.0 } }"#).is_err());
        assert!(SketchConfig::from_json_str(r#"{ "width": 0 }"#).is_err());
        assert!(SketchConfig::from_json_str(r#"{ "pointer_threshold": -1.0 }"#).is_err());
    }

    #[test]
    fn test_load_reports_path() {
        let err = SketchConfig::load(std::path::Path::new("/nonexistent/sketch.json")).unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/sketch.json"));
    }
}

#[cfg(test)]
mod cli_tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["ripple-brush"]);
        assert_eq!(cli.route, Route::Home);
        assert!(cli.config.is_none());

        let config = SketchConfig::resolve(&cli).unwrap();
        assert_eq!(config, SketchConfig::default());
    }

    #[test]
    fn test_route_flag() {
        let cli = Cli::parse_from(["ripple-brush", "--route", "home"]);
        assert_eq!(cli.route, Route::Home);
        assert!(Cli::try_parse_from(["ripple-brush", "--route", "about"]).is_err());
    }

    #[test]
    fn test_flags_override_file() {
        let path = temp_config(
            "override",
            r#"{ "brush": { "pool_size": 10 }, "seed": 1, "time_mode": "elapsed" }"#,
        );
        let cli = Cli::parse_from([
            "ripple-brush",
            "--config",
            path.to_str().unwrap(),
            "--pool-size",
            "20",
            "--time-mode",
            "accumulating",
            "--texture",
            "base.png",
        ]);

        let config = SketchConfig::resolve(&cli).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(config.brush.pool_size, 20);
        assert_eq!(config.time_mode, TimeMode::Accumulating);
        assert_eq!(config.seed, Some(1));
        assert_eq!(config.base_texture, Some(PathBuf::from("base.png")));
        assert_eq!(config.brush_texture, None);
    }

    #[test]
    fn test_zero_pool_flag_rejected() {
        let cli = Cli::parse_from(["ripple-brush", "--pool-size", "0"]);
        assert!(SketchConfig::resolve(&cli).is_err());
    }
}
