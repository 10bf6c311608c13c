use crate::symbols::UnitSymbolTable;
use serde::{Deserialize, Serialize};

/// Configuration for one migration run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewriteConfig {
    /// Spellings of the old namespace tag, longest first
    pub old_namespaces: Vec<String>,

    /// Namespace tag of the replacement library
    pub new_namespace: String,

    /// Template used for plain quantity types
    pub quantity_template: String,

    /// Free function that replaces the scalar-extraction call
    pub value_function: String,

    /// Scalar-extraction call of the old library
    pub value_call: String,

    /// Marker left behind by literal rewriting inside `decltype(...)`
    pub block_marker: String,

    /// Include-line prefixes of the old per-dimension headers
    pub old_include_prefixes: Vec<String>,

    /// Include line that replaces all old headers
    pub base_include: String,

    /// Extra include needed by US customary units
    pub usc_include: String,

    /// Comment suppressing value-extraction rewriting on its own line
    pub same_line_escape: String,

    /// Comment line suppressing value-extraction rewriting on the next line
    pub next_line_escape: String,

    /// Treat capitalized bare identifiers as unit template parameters
    pub assume_capitalized_units: bool,

    /// Warn when include lines and body changes disagree
    pub check_includes: bool,

    pub symbols: UnitSymbolTable,
}

impl Default for RewriteConfig {
    fn default() -> Self {
        Self {
            old_namespaces: vec!["wpi::units::".to_string(), "units::".to_string()],
            new_namespace: "mp::".to_string(),
            quantity_template: "mp::quantity".to_string(),
            value_function: "mp::value".to_string(),
            value_call: ".value()".to_string(),
            block_marker: "decltype(1.0 * ".to_string(),
            old_include_prefixes: vec![
                "#include \"wpi/units/".to_string(),
                "#include <wpi/units/".to_string(),
                "#include \"units/".to_string(),
                "#include <units/".to_string(),
            ],
            base_include: "#include \"wpi/units.hpp\"".to_string(),
            usc_include: "#include \"wpi/units-usc.hpp\"".to_string(),
            same_line_escape: "// non-unit .value()".to_string(),
            next_line_escape: "// next line non-unit .value()".to_string(),
            assume_capitalized_units: true,
            check_includes: false,
            symbols: UnitSymbolTable::builtin(),
        }
    }
}

impl RewriteConfig {
    /// Config without the capitalized-identifier guess
    pub fn strict() -> Self {
        Self {
            assume_capitalized_units: false,
            ..Default::default()
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.old_namespaces.is_empty() {
            return Err("old_namespaces must not be empty".to_string());
        }

        for namespace in self.old_namespaces.iter().chain([&self.new_namespace]) {
            if !namespace.ends_with("::") || namespace.len() <= 2 {
                return Err(format!("namespace {namespace:?} must end with \"::\""));
            }
        }

        if self.old_namespaces.contains(&self.new_namespace) {
            return Err(format!(
                "new_namespace {:?} is also listed as an old namespace",
                self.new_namespace
            ));
        }

        if !self.value_call.starts_with('.') || !self.value_call.ends_with("()") {
            return Err(format!("value_call {:?} must look like .name()", self.value_call));
        }

        if !self.block_marker.ends_with(' ') || !self.block_marker.contains('(') {
            return Err(format!(
                "block_marker {:?} must open a group and end with a space",
                self.block_marker
            ));
        }

        for (name, value) in [
            ("quantity_template", &self.quantity_template),
            ("value_function", &self.value_function),
            ("base_include", &self.base_include),
            ("usc_include", &self.usc_include),
            ("same_line_escape", &self.same_line_escape),
            ("next_line_escape", &self.next_line_escape),
        ] {
            if value.trim().is_empty() {
                return Err(format!("{name} must not be empty"));
            }
        }

        if self.old_include_prefixes.iter().any(String::is_empty) {
            return Err("old_include_prefixes must not contain empty prefixes".to_string());
        }

        self.symbols.validate().map_err(|e| e.to_string())
    }

    /// Old namespaces ordered longest first
    pub(crate) fn namespaces_longest_first(&self) -> Vec<&str> {
        let mut namespaces: Vec<&str> = self.old_namespaces.iter().map(String::as_str).collect();
        namespaces.sort_by_key(|ns| std::cmp::Reverse(ns.len()));
        namespaces
    }
}
