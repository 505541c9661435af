//! End-to-end conversion: load, collect, render, write.

use serde::Serialize;
use std::path::PathBuf;

use crate::collect::{collect, NameMapping};
use crate::defaults::{ConvertConfig, ConvertOptions};
use crate::diagnostics::Diagnostics;
use crate::error::Result;
use crate::{loader, render};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversion {
    /// Sorted `export` lines without the header; empty when nothing ran.
    pub export_block: String,
    pub mapping: NameMapping,
    /// Path of the written script, `None` when the input was missing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub written: Option<PathBuf>,
}

impl Conversion {
    pub fn export_count(&self) -> usize {
        self.mapping.len()
    }
}

/// Convert with a partial configuration; unset fields take their defaults.
pub fn convert(options: ConvertOptions, diagnostics: &mut Diagnostics) -> Result<Conversion> {
    run(&ConvertConfig::resolve(options), diagnostics)
}

/// Convert with a fully resolved configuration.
///
/// A missing input is a no-op unless `fail_on_missing` is set. Nothing is
/// written unless every output was collected without collisions.
pub fn run(config: &ConvertConfig, diagnostics: &mut Diagnostics) -> Result<Conversion> {
    diagnostics.debug(format!(
        "input={} output={} fail_on_missing={}",
        config.input.display(),
        config.output.display(),
        config.fail_on_missing
    ));

    let outputs = match loader::load(&config.input, diagnostics) {
        Ok(outputs) => outputs,
        Err(err) if err.is_not_found() && !config.fail_on_missing => {
            diagnostics.info(format!(
                "{} does not exist yet; nothing to do",
                config.input.display()
            ));
            return Ok(Conversion::default());
        }
        Err(err) => return Err(err),
    };

    let collection = collect(&outputs, diagnostics)?;
    let script = render::render(&collection.items, &collection.mapping);
    render::write(&config.output, &script, diagnostics)?;

    diagnostics.info(format!(
        "Wrote {} export(s) to {}",
        collection.items.len(),
        config.output.display()
    ));

    Ok(Conversion {
        export_block: render::export_block(&collection.items),
        mapping: collection.mapping,
        written: Some(config.output.clone()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::{Level, Verbosity};
    use std::fs;
    use tempfile::TempDir;

    fn options(dir: &TempDir, fail_on_missing: bool) -> ConvertOptions {
        ConvertOptions {
            input: Some(dir.path().join("outputs.json")),
            output: Some(dir.path().join("out/env.sh")),
            fail_on_missing: Some(fail_on_missing),
            verbosity: None,
        }
    }

    #[test]
    fn missing_input_is_a_quiet_no_op() {
        let dir = TempDir::new().unwrap();
        let mut diagnostics = Diagnostics::new(Verbosity::INFO);

        let conversion = convert(options(&dir, false), &mut diagnostics).unwrap();

        assert_eq!(conversion, Conversion::default());
        assert_eq!(conversion.export_block, "");
        assert!(conversion.mapping.is_empty());
        assert!(!dir.path().join("out/env.sh").exists());
        assert_eq!(diagnostics.at(Level::Info).count(), 1);
    }

    #[test]
    fn missing_input_fails_when_requested() {
        let dir = TempDir::new().unwrap();
        let mut diagnostics = Diagnostics::new(Verbosity::QUIET);

        let err = convert(options(&dir, true), &mut diagnostics).unwrap_err();

        assert!(err.is_not_found());
        assert!(!dir.path().join("out/env.sh").exists());
    }

    #[test]
    fn parse_errors_are_never_swallowed() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("outputs.json"), "not json").unwrap();
        let mut diagnostics = Diagnostics::new(Verbosity::QUIET);

        let err = convert(options(&dir, false), &mut diagnostics).unwrap_err();
        assert_eq!(err.code.as_str(), "input.parse_failed");
    }

    #[test]
    fn converts_and_writes() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("outputs.json"),
            r#"{"AwsCdkP0Stack":{"InstanceId":"i-123"}}"#,
        )
        .unwrap();
        let mut diagnostics = Diagnostics::new(Verbosity::QUIET);

        let conversion = convert(options(&dir, false), &mut diagnostics).unwrap();

        assert_eq!(
            conversion.export_block,
            "export AWSCDKP0STACK_INSTANCEID='i-123'"
        );
        assert_eq!(
            conversion.mapping["AWSCDKP0STACK_INSTANCEID"],
            "AwsCdkP0Stack.InstanceId"
        );
        assert_eq!(conversion.export_count(), 1);

        let script = fs::read_to_string(dir.path().join("out/env.sh")).unwrap();
        assert!(script.contains("# AWSCDKP0STACK_INSTANCEID <= AwsCdkP0Stack.InstanceId\n"));
        assert!(script.ends_with("export AWSCDKP0STACK_INSTANCEID='i-123'\n"));
        assert_eq!(conversion.written, Some(dir.path().join("out/env.sh")));
    }

    #[test]
    fn collision_leaves_previous_output_untouched() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("out/env.sh");
        fs::create_dir_all(out.parent().unwrap()).unwrap();
        fs::write(&out, "previous").unwrap();
        fs::write(
            dir.path().join("outputs.json"),
            r#"{"S":{"a-b":"1","a_b":"2"}}"#,
        )
        .unwrap();
        let mut diagnostics = Diagnostics::new(Verbosity::QUIET);

        let err = convert(options(&dir, false), &mut diagnostics).unwrap_err();

        assert_eq!(err.code.as_str(), "name.collision");
        assert_eq!(fs::read_to_string(&out).unwrap(), "previous");
        assert_eq!(diagnostics.at(Level::Error).count(), 1);
    }
}
