use crate::dop::*;

use serde::{Deserialize, Serialize};
use serde_json::Value as JSValue;
use std::path::PathBuf;

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct HouseSettings {
    pub input: String,
    pub output: Option<String>,
    pub reference: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct SenateSettings {
    pub inputs: Vec<String>,
    pub tickets: String,
    pub output: Option<String>,
    pub reference: Option<String>,
}

/// The content of a job file.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct ConvertConfig {
    pub house: Option<HouseSettings>,
    pub senate: Option<SenateSettings>,
    #[serde(rename = "prettyPrint")]
    pub pretty_print: Option<bool>,
}

impl ConvertConfig {
    /// Makes all the paths relative to `root`. Absolute paths and `stdout` are kept.
    pub fn resolve_paths(self, root: &Path) -> ConvertConfig {
        let root_s = root.display().to_string();
        let resolve = |p: String| -> String {
            if p == STDOUT {
                p
            } else {
                let full: PathBuf = [root_s.clone(), p].iter().collect();
                full.as_path().display().to_string()
            }
        };
        ConvertConfig {
            house: self.house.map(|h| HouseSettings {
                input: resolve(h.input),
                output: h.output.map(resolve),
                reference: h.reference.map(resolve),
            }),
            senate: self.senate.map(|s| SenateSettings {
                inputs: s.inputs.into_iter().map(resolve).collect(),
                tickets: resolve(s.tickets),
                output: s.output.map(resolve),
                reference: s.reference.map(resolve),
            }),
            pretty_print: self.pretty_print,
        }
    }
}

pub fn parse_config(contents: &str, path: &str) -> ConvertResult<ConvertConfig> {
    serde_json::from_str(contents).context(ParsingJsonSnafu { path })
}

pub fn read_config(path: &Path) -> ConvertResult<ConvertConfig> {
    let path_s = path.display().to_string();
    info!("Reading job file {}", path_s);
    let contents = fs::read_to_string(path).context(OpeningFileSnafu {
        path: path_s.clone(),
    })?;
    let config = parse_config(&contents, &path_s)?;
    let root = path.parent().context(MissingParentDirSnafu {
        path: path_s.clone(),
    })?;
    Ok(config.resolve_paths(root))
}

pub fn read_reference(path: &str) -> ConvertResult<JSValue> {
    let contents = fs::read_to_string(path).context(OpeningFileSnafu { path })?;
    debug!("Read reference {} ({} bytes)", path, contents.len());
    serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu { path })
}

#[cfg(test)]
mod tests {
    use super::*;

    const JOB: &str = r#"{
        "house": { "input": "house.csv", "output": "stdout", "reference": null },
        "senate": {
            "inputs": ["act.csv", "/abs/nt.csv"],
            "tickets": "tickets.json",
            "output": "senate.json",
            "reference": null
        },
        "prettyPrint": true
    }"#;

    #[test]
    fn parse_and_resolve() {
        let config = parse_config(JOB, "job.json")
            .unwrap()
            .resolve_paths(Path::new("/jobs"));
        let house = config.house.unwrap();
        assert_eq!(house.input, "/jobs/house.csv");
        assert_eq!(house.output, Some("stdout".to_string()));
        let senate = config.senate.unwrap();
        assert_eq!(senate.inputs, vec!["/jobs/act.csv", "/abs/nt.csv"]);
        assert_eq!(senate.tickets, "/jobs/tickets.json");
        assert_eq!(config.pretty_print, Some(true));
    }

    #[test]
    fn missing_sections() {
        let config = parse_config(r#"{ "house": null, "senate": null, "prettyPrint": null }"#, "job.json").unwrap();
        assert_eq!(config.house, None);
        assert!(parse_config("{ not json", "job.json").is_err());
    }
}
