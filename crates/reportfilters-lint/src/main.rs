use anyhow::bail;
use reportfilters_core::{FilterRegistry, ReportFile, ReportIndex, SystemClock};

/// Validates every report file listed in an index, warns about descriptor keys
/// outside the host shape, and prints today's resolved defaults for the ones
/// that pass. Unlike the server, keeps going after a bad file so all problems
/// are reported in one run.
///
/// Usage: `reportfilters-lint [INDEX]` (falls back to `REPORTS_INDEX`).
fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt().init();

    let index_path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("REPORTS_INDEX").ok())
        .unwrap_or_else(|| "config/reports/index.json".to_string());

    let index = ReportIndex::read(&index_path)?;
    let mut builder = FilterRegistry::builder();
    let mut failures = 0usize;

    for path in index.report_paths() {
        let result = ReportFile::read_with_unknown_keys(&path).and_then(|(file, unknown)| {
            for key in &unknown {
                tracing::warn!("{}: unknown descriptor key '{key}' is ignored", path.display());
            }
            builder.register(file.report_name, file.filters).map_err(Into::into)
        });

        match result {
            Ok(()) => tracing::info!("ok: {}", path.display()),
            Err(e) => {
                failures += 1;
                tracing::error!("{}: {e:#}", path.display());
            }
        }
    }

    let registry = builder.build();
    for name in registry.report_names() {
        let defaults = registry.resolve_defaults(name, &SystemClock)?;
        println!("{name}: {}", serde_json::to_string(&defaults)?);
    }

    if failures > 0 {
        bail!("{failures} report file(s) failed validation");
    }
    Ok(())
}
