//! In-memory parameter registry.

use std::collections::BTreeMap;

use rangewatch_sdk::{Param, ParamError, ParamGroup, ParamRegistry, ParamValue};

/// A registered tunable together with the group it was registered under.
#[derive(Debug, Clone)]
pub struct RegisteredParam {
    pub group: ParamGroup,
    pub param: Param,
}

/// A [`ParamRegistry`] addressing tunables by `group/key` paths.
///
/// Values arriving as text (from a broker or a config file) can be applied
/// with [`MemoryRegistry::apply`].
#[derive(Debug, Default)]
pub struct MemoryRegistry {
    params: BTreeMap<String, RegisteredParam>,
}

impl MemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// All registered paths, sorted.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.params.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn entry(&self, path: &str) -> Option<&RegisteredParam> {
        self.params.get(path)
    }

    /// Current value at `path`.
    pub fn get(&self, path: &str) -> Option<ParamValue> {
        self.params.get(path).map(|p| p.param.value())
    }

    /// Set the value at `path`.
    pub fn set(&self, path: &str, value: ParamValue) -> Result<(), ParamError> {
        self.params
            .get(path)
            .ok_or_else(|| ParamError::Unknown(path.to_string()))?
            .param
            .set(value)
    }

    /// Parse `raw` according to the parameter's kind and set it.
    pub fn apply(&self, path: &str, raw: &str) -> Result<(), ParamError> {
        let entry = self
            .params
            .get(path)
            .ok_or_else(|| ParamError::Unknown(path.to_string()))?;
        let field = entry.param.key();
        let raw = raw.trim();

        let value = match entry.param.value() {
            ParamValue::Bool(_) => ParamValue::Bool(parse_bool(raw).ok_or(ParamError::Invalid {
                field,
                reason: "not a boolean",
            })?),
            ParamValue::Float(_) => ParamValue::Float(raw.parse().map_err(|_| ParamError::Invalid {
                field,
                reason: "not a number",
            })?),
        };
        entry.param.set(value)
    }
}

impl ParamRegistry for MemoryRegistry {
    fn register(&mut self, group: &ParamGroup, param: Param) {
        let path = format!("{}/{}", group.key, param.key());
        self.params.insert(
            path,
            RegisteredParam {
                group: group.clone(),
                param,
            },
        );
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" => Some(false),
        _ => None,
    }
}
