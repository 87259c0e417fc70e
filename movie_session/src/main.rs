use std::fs;

use anyhow::{Context, Result};
use movie_overlay::MovieSettings;

mod cli;
mod script;

use script::{run_script, SessionScript};

fn main() -> Result<()> {
    let args = cli::parse()?;

    env_logger::init();

    let settings = MovieSettings::from_json_file(args.settings.as_deref())
        .context("loading movie settings")?;
    let script = SessionScript::from_json_file(&args.script).context("loading session script")?;
    log::info!(
        "[movie_session] running {} steps against {} displayables (channel '{}')",
        script.steps.len(),
        script.displayables.len(),
        settings.channel
    );

    let mut run = run_script(&script, settings)?;

    for record in &run.records {
        println!("{}", record.marker);
        if args.verbose {
            let detail = serde_json::to_string(&record.outcome)
                .context("serializing step outcome to JSON")?;
            println!("    {detail}");
        }
    }

    if let Some(path) = args.event_log_json.as_ref() {
        let log = run.event_log();
        let json =
            serde_json::to_string_pretty(&log).context("serializing session event log to JSON")?;
        fs::write(path, json)
            .with_context(|| format!("writing event log JSON to {}", path.display()))?;
        println!("Saved movie event log to {}", path.display());
    }

    if let Some(path) = args.dump_surface.as_ref() {
        match run.session.state().surface() {
            Some(surface) => {
                surface.save_png(path)?;
                println!(
                    "Saved {} ({}) to {}",
                    surface.id(),
                    surface.size(),
                    path.display()
                );
            }
            None => println!("No cached movie surface; skipping --dump-surface"),
        }
    }

    let phase = run.session.controller().phase();
    println!(
        "Final phase: {} | default size: {}",
        serde_json::to_string(&phase).context("serializing final phase")?,
        run.session.state().default_size()
    );

    Ok(())
}
