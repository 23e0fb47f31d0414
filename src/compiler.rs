//! Asset catalog compilation driver wrapping `actool`.

use std::fs;
use std::io::{ErrorKind, Read};
use std::path::Path;
use std::process::{Command, ExitStatus, Stdio};

use tempfile::NamedTempFile;

use crate::config::ToolConfig;
use crate::error::{CompileError, CompileResult};
use crate::filter::{filter_compiler_output, rewrite_all_lines};
use crate::request::CompileRequest;

/// Runs `actool` for a [`CompileRequest`] and turns any residual diagnostic into a failure.
pub struct CatalogCompiler {
  config: ToolConfig,
}

impl CatalogCompiler {
  /// Create a compiler launching the tool described by `config`.
  pub fn new(config: ToolConfig) -> Self {
    Self { config }
  }

  /// Compile the requested catalogs.
  ///
  /// The output is validated before anything touches the filesystem. An existing output is
  /// removed, then `actool` runs once with its stdout and stderr merged. A failure status
  /// surfaces the whole output; a success status still fails when the filtered output is not
  /// empty, since `actool` sometimes reports errors while exiting with zero.
  #[tracing::instrument(skip_all, fields(output = %request.output.display()))]
  pub fn compile(&self, request: &CompileRequest) -> CompileResult<()> {
    request.validate()?;
    remove_existing_output(&request.output)?;

    // Held until the end of the run so the file outlives the subprocess on every path.
    let mut _temporary_plist: Option<NamedTempFile> = None;
    let partial_info_plist = match &request.partial_info_plist {
      Some(path) => path.clone(),
      None => {
        let file = tempfile::Builder::new()
          .suffix(".plist")
          .tempfile()
          .map_err(|err| CompileError::io("failed to create temporary partial Info.plist", err))?;
        let path = file.path().to_path_buf();
        _temporary_plist = Some(file);
        path
      }
    };

    let invocation = request.invocation(&partial_info_plist)?;
    tracing::debug!(
      program = %self.config.program,
      args = ?invocation.args,
      "invoking actool"
    );

    let (status, output) = self.run_tool(&invocation.args)?;

    if !status.success() {
      tracing::debug!(%status, "actool exited with failure status");
      return Err(CompileError::ToolFailed {
        status,
        output: rewrite_all_lines(&output, &invocation.rewrites),
      });
    }

    let report = filter_compiler_output(&output, &invocation.rewrites);
    if !report.is_empty() {
      return Err(CompileError::Diagnostics { report });
    }

    Ok(())
  }

  /// Spawn the tool with stdout and stderr sharing one pipe and wait for it to exit.
  fn run_tool(&self, args: &[String]) -> CompileResult<(ExitStatus, String)> {
    let spawn_error = |source| CompileError::Spawn {
      program: self.config.program.clone(),
      source,
    };

    let (mut reader, writer) = std::io::pipe().map_err(spawn_error)?;
    let mut child = {
      let mut command = Command::new(&self.config.program);
      command
        .args(&self.config.program_args)
        .args(args)
        .stdin(Stdio::null())
        .stdout(writer.try_clone().map_err(spawn_error)?)
        .stderr(writer);
      // The command owns the parent's copies of the write end; it must be dropped before
      // reading or the pipe never reaches end of file.
      command.spawn().map_err(spawn_error)?
    };

    let mut captured = Vec::new();
    reader.read_to_end(&mut captured).map_err(spawn_error)?;
    let status = child.wait().map_err(spawn_error)?;

    Ok((status, String::from_utf8_lossy(&captured).into_owned()))
  }
}

impl Default for CatalogCompiler {
  fn default() -> Self {
    Self::new(ToolConfig::default())
  }
}

/// Remove a previous compilation result, whether a file or a directory.
fn remove_existing_output(output: &Path) -> CompileResult<()> {
  let metadata = match fs::symlink_metadata(output) {
    Ok(metadata) => metadata,
    Err(err) if err.kind() == ErrorKind::NotFound => return Ok(()),
    Err(err) => {
      return Err(CompileError::io(
        format!("failed to inspect {}", output.display()),
        err,
      ));
    }
  };

  let result = if metadata.is_dir() {
    fs::remove_dir_all(output)
  } else {
    fs::remove_file(output)
  };
  result.map_err(|err| CompileError::io(format!("failed to remove {}", output.display()), err))?;
  tracing::debug!(path = %output.display(), "removed previous output");
  Ok(())
}
