//! Format property value object - the module-format variants a manifest can declare

use serde::{Deserialize, Serialize};

use super::module_format::ModuleFormat;

/// A recognized manifest property naming one distributed module-format
/// variant of an entry point.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum FormatProperty {
    /// UMD / CommonJS build (`main`)
    Main,
    /// ES5 build with ES module syntax (`module`)
    Module,
    /// ES2015 build (`es2015`)
    Es2015,
    /// Unflattened ES5 module build (`esm5`)
    Esm5,
    /// Unflattened ES2015 module build (`esm2015`)
    Esm2015,
    /// Flattened ES5 module bundle (`fesm5`)
    Fesm5,
    /// Flattened ES2015 module bundle (`fesm2015`)
    Fesm2015,
}

impl FormatProperty {
    /// Every recognized property, in canonical order
    pub const ALL: [FormatProperty; 7] = [
        FormatProperty::Main,
        FormatProperty::Module,
        FormatProperty::Es2015,
        FormatProperty::Esm5,
        FormatProperty::Esm2015,
        FormatProperty::Fesm5,
        FormatProperty::Fesm2015,
    ];

    /// The manifest key this property is declared under
    pub fn as_str(&self) -> &'static str {
        match self {
            FormatProperty::Main => "main",
            FormatProperty::Module => "module",
            FormatProperty::Es2015 => "es2015",
            FormatProperty::Esm5 => "esm5",
            FormatProperty::Esm2015 => "esm2015",
            FormatProperty::Fesm5 => "fesm5",
            FormatProperty::Fesm2015 => "fesm2015",
        }
    }

    /// Look a property up by its manifest key
    pub fn from_key(key: &str) -> Option<FormatProperty> {
        Self::ALL.iter().copied().find(|p| p.as_str() == key)
    }

    /// The module format family the transformer sees for this property
    pub fn module_format(&self) -> ModuleFormat {
        match self {
            FormatProperty::Main => ModuleFormat::Umd,
            FormatProperty::Module | FormatProperty::Esm5 | FormatProperty::Fesm5 => {
                ModuleFormat::Esm5
            }
            FormatProperty::Es2015 | FormatProperty::Esm2015 | FormatProperty::Fesm2015 => {
                ModuleFormat::Esm2015
            }
        }
    }
}

impl std::fmt::Display for FormatProperty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
