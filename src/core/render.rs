//! Serializes accepted exports into a sourceable shell script.

use serde_json::Value;
use std::path::Path;

use crate::collect::{ExportItem, NameMapping};
use crate::diagnostics::Diagnostics;
use crate::error::Result;
use crate::utils::{io, shell};

const BANNER: &[&str] = &[
    "#!/bin/sh",
    "# Generated by stackenv from deployment stack outputs. Do not edit.",
    "# shellcheck disable=SC2034",
    "# Usage: . <this file>",
];

/// Shell-facing string form of a scalar. `null` becomes the empty string.
pub fn stringify(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::String(s) => s.clone(),
        Value::Number(n) => {
            if n.is_i64() || n.is_u64() {
                n.to_string()
            } else {
                n.as_f64().map(format_float).unwrap_or_else(|| n.to_string())
            }
        }
        // Nested values are filtered out by the collector.
        other => other.to_string(),
    }
}

/// JavaScript `Number#toString` form: no `.0` on whole numbers, no `-0`,
/// and exponent notation outside `1e-6 <= |x| < 1e21`.
fn format_float(f: f64) -> String {
    if f == 0.0 {
        return "0".to_string();
    }

    let magnitude = f.abs();
    if !(1e-6..1e21).contains(&magnitude) {
        // `{:e}` gives `1e21` / `1.5e-7`; JS writes a sign on positive exponents.
        let exp = format!("{:e}", f);
        return match exp.split_once('e') {
            Some((mantissa, power)) if !power.starts_with('-') => {
                format!("{}e+{}", mantissa, power)
            }
            _ => exp,
        };
    }

    f.to_string()
}

pub fn export_line(item: &ExportItem) -> String {
    format!(
        "export {}={}",
        item.derived_name,
        shell::quote_value(&stringify(&item.value))
    )
}

/// Export lines, sorted by full line text, joined with newlines.
pub fn export_block(items: &[ExportItem]) -> String {
    let mut lines: Vec<String> = items.iter().map(export_line).collect();
    lines.sort();
    lines.join("\n")
}

pub fn render(items: &[ExportItem], mapping: &NameMapping) -> String {
    let mut out = String::new();

    for line in BANNER {
        out.push_str(line);
        out.push('\n');
    }
    // BTreeMap iteration is already sorted by derived name.
    for (name, origin) in mapping {
        out.push_str(&format!(
            "# {} <= {}\n",
            name,
            shell::escape_comment(origin)
        ));
    }

    out.push('\n');

    let block = export_block(items);
    if !block.is_empty() {
        out.push_str(&block);
        out.push('\n');
    }

    out
}

pub fn write(path: &Path, text: &str, diagnostics: &mut Diagnostics) -> Result<()> {
    io::write_file(path, text)?;
    diagnostics.debug(format!("Wrote {} bytes to {}", text.len(), path.display()));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn item(group: &str, key: &str, name: &str, value: Value) -> ExportItem {
        ExportItem {
            group: group.to_string(),
            key: key.to_string(),
            derived_name: name.to_string(),
            value,
        }
    }

    fn mapping_for(items: &[ExportItem]) -> NameMapping {
        items
            .iter()
            .map(|i| (i.derived_name.clone(), i.origin()))
            .collect()
    }

    #[test]
    fn stringify_scalars() {
        assert_eq!(stringify(&Value::Null), "");
        assert_eq!(stringify(&json!(true)), "true");
        assert_eq!(stringify(&json!(false)), "false");
        assert_eq!(stringify(&json!(42)), "42");
        assert_eq!(stringify(&json!(-7)), "-7");
        assert_eq!(stringify(&json!(1.5)), "1.5");
        assert_eq!(stringify(&json!(2.0)), "2");
        assert_eq!(stringify(&json!("  spaced ")), "  spaced ");
    }

    #[test]
    fn stringify_floats_like_javascript() {
        assert_eq!(stringify(&json!(1e21)), "1e+21");
        assert_eq!(stringify(&json!(1.5e300)), "1.5e+300");
        assert_eq!(stringify(&json!(1e-7)), "1e-7");
        assert_eq!(stringify(&json!(-2.5e-8)), "-2.5e-8");
        assert_eq!(stringify(&json!(-0.0)), "0");
        assert_eq!(stringify(&json!(0.000001)), "0.000001");
        assert_eq!(stringify(&json!(1e20)), "100000000000000000000");
        assert_eq!(stringify(&json!(0.1)), "0.1");
    }

    #[test]
    fn export_line_quotes_value() {
        let line = export_line(&item(
            "AwsCdkP0Stack",
            "InstanceId",
            "AWSCDKP0STACK_INSTANCEID",
            json!("i-123"),
        ));
        assert_eq!(line, "export AWSCDKP0STACK_INSTANCEID='i-123'");
    }

    #[test]
    fn export_line_escapes_single_quotes() {
        let line = export_line(&item("S", "Name", "S_NAME", json!("O'Brien")));
        assert_eq!(line, r#"export S_NAME='O'"'"'Brien'"#);
    }

    #[test]
    fn export_line_null_is_empty_string() {
        let line = export_line(&item("S", "K", "S_K", Value::Null));
        assert_eq!(line, "export S_K=''");
    }

    #[test]
    fn export_block_sorts_by_line() {
        let items = vec![
            item("S", "b", "S_B", json!("2")),
            item("S", "a", "S_A", json!("1")),
        ];
        assert_eq!(export_block(&items), "export S_A='1'\nexport S_B='2'");
    }

    #[test]
    fn render_layout() {
        let items = vec![
            item("Z", "k", "Z_K", json!("z")),
            item("A", "k", "A_K", json!(1)),
        ];
        let text = render(&items, &mapping_for(&items));

        let expected = [
            BANNER.join("\n").as_str(),
            "# A_K <= A.k",
            "# Z_K <= Z.k",
            "",
            "export A_K='1'",
            "export Z_K='z'",
            "",
        ]
        .join("\n");
        assert_eq!(text, expected);
        assert!(text.starts_with("#!/bin/sh\n"));
    }

    #[test]
    fn render_escapes_control_characters_in_origins() {
        let items = vec![item(
            "G\nrm -rf /",
            "x\ntouch pwned\n",
            "G_RM_RF_X_TOUCH_PWNED",
            json!("v"),
        )];
        let text = render(&items, &mapping_for(&items));

        assert!(text.contains("# G_RM_RF_X_TOUCH_PWNED <= G\\nrm -rf /.x\\ntouch pwned\\n\n"));
        for line in text.lines().filter(|l| !l.is_empty()) {
            assert!(
                line.starts_with('#') || line.starts_with("export "),
                "unexpected line: {}",
                line
            );
        }
    }

    #[test]
    fn render_is_independent_of_item_order() {
        let forward = vec![
            item("A", "k", "A_K", json!("a")),
            item("B", "k", "B_K", json!("b")),
        ];
        let backward: Vec<ExportItem> = forward.iter().rev().cloned().collect();
        assert_eq!(
            render(&forward, &mapping_for(&forward)),
            render(&backward, &mapping_for(&backward))
        );
    }

    #[test]
    fn render_empty_keeps_banner_and_trailing_newline() {
        let text = render(&[], &NameMapping::new());
        assert_eq!(text, format!("{}\n\n", BANNER.join("\n")));
    }

    #[test]
    fn banner_does_not_name_a_particular_output_file() {
        let text = render(&[], &NameMapping::new());
        assert!(text.contains("# Usage: . <this file>\n"));
        assert!(!text.contains("cdk-outputs.sh"));
    }
}
