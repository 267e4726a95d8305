use racecar_viewer::{ViewerConfig, viewer};

fn main() -> anyhow::Result<()> {
    viewer::run(ViewerConfig::default())
}
