/// Renders a saved response to the results fragment, for native builds
///
/// Usage: `speciscan-render <response.json> [config.json]`
#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use std::path::PathBuf;

    use speciscan::{ClientConfig, ResultRenderer, UploadResult};

    let mut args = std::env::args().skip(1);
    let Some(response_path) = args.next().map(PathBuf::from) else {
        eprintln!("Usage: speciscan-render <response.json> [config.json]");
        std::process::exit(2);
    };

    let config = match args.next() {
        Some(path) => match ClientConfig::load_from_path(path.as_ref()) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Failed to load configuration from {}: {}", path, e);
                std::process::exit(1);
            }
        },
        None => ClientConfig::default(),
    };

    env_logger::Builder::new()
        .filter_level(config.log_level.to_level_filter())
        .parse_default_env()
        .init();

    let result = match std::fs::read_to_string(&response_path)
        .map_err(|e| e.to_string())
        .and_then(|json| UploadResult::from_json(&json).map_err(|e| e.to_string()))
    {
        Ok(result) => result,
        Err(e) => {
            eprintln!("Failed to read response {:?}: {}", response_path, e);
            std::process::exit(1);
        }
    };

    let renderer = ResultRenderer::new(config.placeholder_image_url.as_str());
    let rendered = match renderer.render(&result) {
        Ok(rendered) => rendered,
        Err(e) => {
            eprintln!("Failed to render {:?}: {}", response_path, e);
            std::process::exit(1);
        }
    };
    log::info!("Rendered {} result from {:?}", rendered.kind.name(), response_path);
    print!("{}", rendered.html);
}

// WASM doesn't use main(), it uses wasm_bindgen's start function
#[cfg(target_arch = "wasm32")]
fn main() {}
