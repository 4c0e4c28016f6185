//! External HDL-to-BTOR2 synthesis adapter.
//!
//! Synthesis is a black box: a caller-supplied shell command template
//! with `{input}`, `{top}` and `{output}` placeholders. The default runs
//! the yosys `clk2fflogic` flow, which keeps clocks as ordinary inputs.

use std::path::{Path, PathBuf};
use std::process::Command;

use thiserror::Error;
use tracing::info;

pub const DEFAULT_TEMPLATE: &str = "yosys -p \"read_verilog -nomem2reg -sv {input}; \
     prep -top {top}; hierarchy -check; memory -nomap; flatten; clk2fflogic; \
     setundef -undriven -anyseq; write_btor {output}\"";

#[derive(Debug, Error)]
pub enum SynthError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("synthesis command exited with {0}")]
    CommandFailed(std::process::ExitStatus),
    #[error("synthesis did not produce {}", .0.display())]
    MissingOutput(PathBuf),
}

pub fn render_template(template: &str, input: &Path, top: &str, output: &Path) -> String {
    template
        .replace("{input}", &input.display().to_string())
        .replace("{top}", top)
        .replace("{output}", &output.display().to_string())
}

/// Return a BTOR2 file for the design, synthesizing when needed.
///
/// Designs that already are `.btor`/`.btor2` pass through; an existing
/// sibling `.btor2` file is reused instead of re-running synthesis.
pub fn ensure_btor2(design: &Path, top: &str, template: Option<&str>) -> Result<PathBuf, SynthError> {
    if matches!(
        design.extension().and_then(|e| e.to_str()),
        Some("btor2") | Some("btor")
    ) {
        return Ok(design.to_path_buf());
    }

    let output = design.with_extension("btor2");
    if output.exists() {
        info!(path = %output.display(), "reusing existing BTOR2 file");
        return Ok(output);
    }

    let command = render_template(template.unwrap_or(DEFAULT_TEMPLATE), design, top, &output);
    info!(%command, "running synthesis");
    let status = Command::new("sh").arg("-c").arg(&command).status()?;
    if !status.success() {
        return Err(SynthError::CommandFailed(status));
    }
    if !output.exists() {
        return Err(SynthError::MissingOutput(output));
    }
    Ok(output)
}
