//! Compilation request and the `actool` command line derived from it.

use std::path::{Component, Path, PathBuf};

use clap::ValueEnum;

use crate::error::{CompileError, CompileResult};
use crate::filter::{PathRewriteTable, PathRewriteTableBuilder};
use crate::scanning::special_asset_flags;

/// File name every compiled asset catalog must carry.
pub const COMPILED_CATALOG_NAME: &str = "Assets.car";

/// Platform the catalog is compiled for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Platform {
  /// macOS applications.
  Mac,
  /// iOS applications; the target environment selects the SDK.
  Ios,
}

/// Environment refining an iOS platform target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TargetEnvironment {
  /// iPhone/iPad simulator.
  Simulator,
  /// Physical iPhone/iPad.
  Device,
  /// iPad app running on macOS.
  Catalyst,
}

/// Everything needed to compile a set of `.xcassets` catalogs into one `Assets.car`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileRequest {
  /// Path to the compiled catalog, relative to the build directory.
  pub output: PathBuf,
  /// Target platform.
  pub platform: Platform,
  /// Optional target environment, only meaningful for iOS.
  pub target_environment: Option<TargetEnvironment>,
  /// Minimum deployment target passed through to `actool`.
  pub minimum_deployment_target: String,
  /// Type of the containing bundle.
  pub product_type: Option<String>,
  /// Recompress PNGs while compiling.
  pub compress_pngs: bool,
  /// Where `actool` should write the partial Info.plist.
  pub partial_info_plist: Option<PathBuf>,
  /// Input `.xcassets` directories, relative to the build directory.
  pub inputs: Vec<PathBuf>,
}

/// Fully resolved `actool` arguments along with the table mapping absolute paths back.
#[derive(Debug, Clone)]
pub struct ActoolInvocation {
  /// Arguments following the configured program and its leading arguments.
  pub args: Vec<String>,
  /// Absolute paths handed to `actool`, mapped to the form the caller used.
  pub rewrites: PathRewriteTable,
}

impl CompileRequest {
  /// Reject requests that cannot produce a compiled catalog.
  pub fn validate(&self) -> CompileResult<()> {
    let is_catalog = self
      .output
      .file_name()
      .is_some_and(|name| name == COMPILED_CATALOG_NAME);
    if !is_catalog {
      return Err(CompileError::InvalidOutputName {
        path: self.output.clone(),
      });
    }

    if self.inputs.is_empty() {
      return Err(CompileError::NoInputs);
    }

    Ok(())
  }

  /// Build the `actool` argument list, writing the partial Info.plist to `partial_info_plist`.
  ///
  /// `actool` requires absolute paths, so every input and output is resolved here and the
  /// original spelling is recorded for rewriting the tool output.
  pub fn invocation(&self, partial_info_plist: &Path) -> CompileResult<ActoolInvocation> {
    let mut args: Vec<String> = vec![
      "--output-format=human-readable-text".into(),
      "--notices".into(),
      "--warnings".into(),
      "--errors".into(),
      "--minimum-deployment-target".into(),
      self.minimum_deployment_target.clone(),
    ];

    if self.compress_pngs {
      args.push("--compress-pngs".into());
    }

    if let Some(product_type) = self.product_type.as_deref().filter(|value| !value.is_empty()) {
      args.push("--product-type".into());
      args.push(product_type.into());
    }

    args.extend(
      platform_flags(self.platform, self.target_environment)
        .iter()
        .map(|flag| flag.to_string()),
    );

    let special_flags = special_asset_flags(&self.inputs)
      .map_err(|err| CompileError::io("failed to scan input asset catalogs", err))?;
    args.extend(special_flags);

    args.push("--output-partial-info-plist".into());
    args.push(display(partial_info_plist));

    let mut rewrites = PathRewriteTable::builder();
    let absolute_output = record_absolute(&mut rewrites, &self.output)?;
    let compile_dir = match self.output.parent().filter(|parent| !parent.as_os_str().is_empty()) {
      Some(parent) => record_absolute(&mut rewrites, parent)?,
      None => absolute_output
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("/")),
    };
    args.push("--compile".into());
    args.push(display(&compile_dir));

    for input in &self.inputs {
      let absolute_input = record_absolute(&mut rewrites, input)?;
      args.push(display(&absolute_input));
    }

    Ok(ActoolInvocation {
      args,
      rewrites: rewrites.build(),
    })
  }
}

/// Flags selecting the SDK and device families for a platform/environment pair.
///
/// macOS ignores the environment; iOS without an environment gets no platform flags at all.
pub fn platform_flags(
  platform: Platform,
  environment: Option<TargetEnvironment>,
) -> &'static [&'static str] {
  match (platform, environment) {
    (Platform::Mac, _) => &["--platform", "macosx", "--target-device", "mac"],
    (Platform::Ios, Some(TargetEnvironment::Simulator)) => &[
      "--platform",
      "iphonesimulator",
      "--target-device",
      "iphone",
      "--target-device",
      "ipad",
    ],
    (Platform::Ios, Some(TargetEnvironment::Device)) => &[
      "--platform",
      "iphoneos",
      "--target-device",
      "iphone",
      "--target-device",
      "ipad",
    ],
    (Platform::Ios, Some(TargetEnvironment::Catalyst)) => &[
      "--platform",
      "macosx",
      "--target-device",
      "ipad",
      "--ui-framework-family",
      "uikit",
    ],
    (Platform::Ios, None) => &[],
  }
}

fn record_absolute(rewrites: &mut PathRewriteTableBuilder, path: &Path) -> CompileResult<PathBuf> {
  let absolute = std::path::absolute(path)
    .map(|absolute| normalize_lexically(&absolute))
    .map_err(|err| CompileError::io(format!("failed to resolve {}", path.display()), err))?;
  rewrites.insert(display(&absolute), display(path));
  Ok(absolute)
}

/// Resolve `.` and `..` components and drop trailing separators without touching the
/// filesystem. `..` never climbs above the root.
fn normalize_lexically(path: &Path) -> PathBuf {
  let mut normalized = PathBuf::new();
  for component in path.components() {
    match component {
      Component::Prefix(_) | Component::RootDir => normalized.push(component),
      Component::CurDir => {}
      Component::ParentDir => {
        if normalized.file_name().is_some() {
          normalized.pop();
        } else if !normalized.has_root() {
          normalized.push(component);
        }
      }
      Component::Normal(name) => normalized.push(name),
    }
  }
  normalized
}

fn display(path: &Path) -> String {
  path.to_string_lossy().into_owned()
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::fs;
  use tempfile::tempdir;

  fn request(output: &str, inputs: Vec<PathBuf>) -> CompileRequest {
    CompileRequest {
      output: PathBuf::from(output),
      platform: Platform::Ios,
      target_environment: Some(TargetEnvironment::Simulator),
      minimum_deployment_target: "15.0".into(),
      product_type: None,
      compress_pngs: false,
      partial_info_plist: None,
      inputs,
    }
  }

  #[test]
  fn rejects_bundle_output() {
    let err = request("out/Foo.bundle", vec![PathBuf::from("a.xcassets")])
      .validate()
      .unwrap_err();
    assert!(matches!(err, CompileError::InvalidOutputName { .. }));
  }

  #[test]
  fn rejects_missing_inputs() {
    let err = request("out/Assets.car", Vec::new()).validate().unwrap_err();
    assert!(matches!(err, CompileError::NoInputs));
  }

  #[test]
  fn accepts_catalog_output() {
    assert!(
      request("out/Foo.app/Assets.car", vec![PathBuf::from("a.xcassets")])
        .validate()
        .is_ok()
    );
  }

  #[test]
  fn mac_ignores_environment() {
    let expected = ["--platform", "macosx", "--target-device", "mac"];
    assert_eq!(platform_flags(Platform::Mac, None), expected);
    assert_eq!(
      platform_flags(Platform::Mac, Some(TargetEnvironment::Device)),
      expected
    );
  }

  #[test]
  fn ios_environments_select_sdk() {
    assert_eq!(
      platform_flags(Platform::Ios, Some(TargetEnvironment::Device))[1],
      "iphoneos"
    );
    assert_eq!(
      platform_flags(Platform::Ios, Some(TargetEnvironment::Catalyst)),
      [
        "--platform",
        "macosx",
        "--target-device",
        "ipad",
        "--ui-framework-family",
        "uikit"
      ]
    );
    assert!(platform_flags(Platform::Ios, None).is_empty());
  }

  #[test]
  fn builds_absolute_command_line() {
    let dir = tempdir().unwrap();
    let catalog = dir.path().join("Images.xcassets");
    fs::create_dir_all(catalog.join("AppIcon.appiconset")).unwrap();
    let output = dir.path().join("Foo.app").join("Assets.car");

    let mut req = request(output.to_str().unwrap(), vec![catalog.clone()]);
    req.compress_pngs = true;
    req.product_type = Some("com.apple.product-type.application".into());

    let invocation = req.invocation(Path::new("/tmp/partial.plist")).unwrap();
    let compile_dir = dir.path().join("Foo.app").to_string_lossy().into_owned();
    let catalog_arg = catalog.to_string_lossy().into_owned();

    assert_eq!(
      invocation.args,
      vec![
        "--output-format=human-readable-text",
        "--notices",
        "--warnings",
        "--errors",
        "--minimum-deployment-target",
        "15.0",
        "--compress-pngs",
        "--product-type",
        "com.apple.product-type.application",
        "--platform",
        "iphonesimulator",
        "--target-device",
        "iphone",
        "--target-device",
        "ipad",
        "--app-icon",
        "AppIcon",
        "--output-partial-info-plist",
        "/tmp/partial.plist",
        "--compile",
        compile_dir.as_str(),
        catalog_arg.as_str(),
      ]
    );
  }

  #[test]
  fn empty_product_type_is_omitted() {
    let mut req = request("out/Assets.car", vec![PathBuf::from("missing.xcassets")]);
    req.product_type = Some(String::new());

    let invocation = req.invocation(Path::new("p.plist")).unwrap();
    assert!(!invocation.args.iter().any(|arg| arg == "--product-type"));
  }

  #[test]
  fn records_relative_spellings() {
    let req = request("out/Assets.car", vec![PathBuf::from("res/Images.xcassets")]);
    let invocation = req.invocation(Path::new("p.plist")).unwrap();

    let cwd = std::env::current_dir().unwrap();
    let absolute_input = cwd.join("res/Images.xcassets");
    let absolute_dir = cwd.join("out");
    let rewrites = &invocation.rewrites;

    assert_eq!(
      rewrites.lookup(&absolute_input.to_string_lossy()),
      "res/Images.xcassets"
    );
    assert_eq!(rewrites.lookup(&absolute_dir.to_string_lossy()), "out");
    assert_eq!(
      invocation.args.last().map(String::as_str),
      Some(&*absolute_input.to_string_lossy())
    );
  }

  #[test]
  fn parent_components_and_trailing_slashes_are_normalized() {
    let req = request(
      "./out/../out/Assets.car",
      vec![PathBuf::from("../ios/Images.xcassets/")],
    );
    let invocation = req.invocation(Path::new("p.plist")).unwrap();

    let cwd = std::env::current_dir().unwrap();
    let parent = cwd.parent().unwrap_or(&cwd);
    let absolute_input = parent.join("ios").join("Images.xcassets");
    let absolute_dir = cwd.join("out");
    let rewrites = &invocation.rewrites;

    assert_eq!(
      invocation.args.last().map(String::as_str),
      Some(&*absolute_input.to_string_lossy())
    );
    assert_eq!(
      arg_after(&invocation.args, "--compile"),
      absolute_dir.to_string_lossy()
    );
    assert_eq!(
      rewrites.lookup(&absolute_input.to_string_lossy()),
      "../ios/Images.xcassets/"
    );
    assert_eq!(
      rewrites.lookup(&absolute_dir.to_string_lossy()),
      "./out/../out"
    );
  }

  #[test]
  fn normalizes_lexically() {
    assert_eq!(
      normalize_lexically(Path::new("/a/./b/../c/")),
      PathBuf::from("/a/c")
    );
    assert_eq!(normalize_lexically(Path::new("/../x")), PathBuf::from("/x"));
    assert_eq!(normalize_lexically(Path::new("/a/b/..")), PathBuf::from("/a"));
  }

  fn arg_after(args: &[String], flag: &str) -> String {
    let index = args.iter().position(|arg| arg == flag).unwrap();
    args[index + 1].clone()
  }
}
