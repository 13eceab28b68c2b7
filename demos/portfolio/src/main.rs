use anyhow::Context;
use flow_scene::SceneConfig;

/// Opens the portfolio scene. An optional argument points to a JSON scene
/// configuration; without it the built-in scene is shown.
fn main() -> anyhow::Result<()> {
    let config = match std::env::args().nth(1) {
        Some(path) => {
            let json = std::fs::read_to_string(&path)
                .with_context(|| format!("could not read {path}"))?;
            SceneConfig::from_json(&json).with_context(|| format!("{path} is not a valid scene"))?
        }
        None => SceneConfig::default(),
    };
    flow_scene::flow::run(config)
}
