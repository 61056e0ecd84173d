//! Module format value object - the format family a transformer compiles

use serde::{Deserialize, Serialize};

/// The module format family behind a format property.
///
/// Several properties share one family (`esm5`, `fesm5` and `module` are
/// all ES5 module builds); the transformer is invoked with the family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleFormat {
    /// ES5 with ES module import/export syntax
    Esm5,
    /// ES2015 modules
    Esm2015,
    /// UMD bundle
    Umd,
}

impl ModuleFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModuleFormat::Esm5 => "esm5",
            ModuleFormat::Esm2015 => "esm2015",
            ModuleFormat::Umd => "umd",
        }
    }
}

impl std::fmt::Display for ModuleFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
