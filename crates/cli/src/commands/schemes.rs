// Registered scheme listing command

use anyhow::Result;
use authgen_core::{PropertyCategory, SchemeRegistry};
use serde::Serialize;

use crate::output::{print_table_header, print_table_row, OutputFormat};

/// Scheme summary for listing
#[derive(Debug, Clone, Serialize)]
pub struct SchemeInfo {
    pub scheme_id: String,
    pub normalized_name: String,
    pub parameters: Vec<String>,
    pub identity_properties: Vec<String>,
    pub signing_properties: Vec<String>,
}

pub fn collect(registry: &SchemeRegistry) -> Vec<SchemeInfo> {
    registry
        .list()
        .map(|scheme| {
            let names = |category| {
                scheme
                    .properties_by_category(category)
                    .into_iter()
                    .map(|p| p.name().to_string())
                    .collect::<Vec<_>>()
            };
            SchemeInfo {
                scheme_id: scheme.scheme_id().to_string(),
                normalized_name: scheme.scheme_id().normalized_name(),
                parameters: scheme
                    .parameters()
                    .iter()
                    .map(|p| p.name().to_string())
                    .collect(),
                identity_properties: names(PropertyCategory::Identity),
                signing_properties: names(PropertyCategory::Signing),
            }
        })
        .collect()
}

fn list_or_dash(values: &[String]) -> String {
    if values.is_empty() {
        "-".to_string()
    } else {
        values.join(",")
    }
}

pub fn run(registry: &SchemeRegistry, output: OutputFormat) -> Result<()> {
    let schemes = collect(registry);

    if !output.is_text() {
        return output.print_value(&serde_json::json!({ "data": schemes, "total": schemes.len() }));
    }

    if schemes.is_empty() {
        println!("No auth schemes registered");
        return Ok(());
    }

    print_table_header(&[("SCHEME", 28), ("PARAMETERS", 12), ("IDENTITY", 10), ("SIGNING", 18)]);
    for scheme in &schemes {
        let parameters = list_or_dash(&scheme.parameters);
        let identity = list_or_dash(&scheme.identity_properties);
        let signing = list_or_dash(&scheme.signing_properties);
        print_table_row(&[
            (&scheme.scheme_id, 28),
            (&parameters, 12),
            (&identity, 10),
            (&signing, 18),
        ]);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collect_builtins() {
        let schemes = collect(&SchemeRegistry::with_builtins().unwrap());
        assert_eq!(schemes.len(), 6);
        assert_eq!(schemes[0].scheme_id, "smithy.api#httpApiKeyAuth");
        assert_eq!(schemes[0].signing_properties, vec!["name", "in", "scheme"]);

        let sigv4 = schemes
            .iter()
            .find(|s| s.scheme_id == "aws.auth#sigv4")
            .unwrap();
        assert_eq!(sigv4.parameters, vec!["region"]);
        assert_eq!(sigv4.normalized_name, "AwsAuthSigv4");
    }
}
