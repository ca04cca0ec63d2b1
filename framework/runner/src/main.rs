use tag_load_runner::prelude::{init, run, BatchDefinitionBuilder};

fn main() -> anyhow::Result<()> {
    let cli = init();

    let completed = run(BatchDefinitionBuilder::new(cli))?;
    log::info!("Completed {completed} scenarios");

    Ok(())
}
