//! Renders the virtual module body and its type declaration

use super::error::{EmitError, EmitResult};
use crate::projection::api::{ExtraFields, ExtraValue, FieldSelection};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use tera::{Context, Tera};

const MODULE_TEMPLATE: &str = "module.js";
const DECLARATION_TEMPLATE: &str = "app-version.d.ts";

static IDENTIFIER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$").expect("identifier pattern is valid"));

/// One member of the generated `AppVersion` interface
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeclaredField {
    pub key: String,
    pub ty: String,
    pub optional: bool,
}

impl DeclaredField {
    fn new(name: &str, ty: &str, optional: bool) -> Self {
        let key = if IDENTIFIER.is_match(name) {
            name.to_string()
        } else {
            json_string(name)
        };
        Self {
            key,
            ty: ty.to_string(),
            optional,
        }
    }
}

/// TypeScript type text for an extra value
pub fn type_of_extra(value: &ExtraValue) -> &'static str {
    match value {
        ExtraValue::Text(_) => "string",
        ExtraValue::Number(_) => "number",
        ExtraValue::Boolean(_) => "boolean",
        ExtraValue::Record(serde_json::Value::Array(_)) => "unknown[]",
        ExtraValue::Record(_) => "Record<string, unknown>",
    }
}

/// Interface members for a projection, in published key order
pub fn declared_fields(selection: &FieldSelection, extra: &ExtraFields) -> Vec<DeclaredField> {
    let mut fields: Vec<(String, DeclaredField)> = selection
        .fields()
        .iter()
        .map(|field| {
            let name = field.name();
            (
                name.to_string(),
                DeclaredField::new(name, "string", field.is_optional()),
            )
        })
        .collect();

    for (name, value) in extra.iter() {
        let declared = DeclaredField::new(name, type_of_extra(value), false);
        match fields.iter_mut().find(|(existing, _)| existing == name) {
            Some((_, slot)) => *slot = declared,
            None => fields.push((name.to_string(), declared)),
        }
    }

    fields.into_iter().map(|(_, declared)| declared).collect()
}

fn json_string(value: &str) -> String {
    serde_json::Value::String(value.to_string()).to_string()
}

/// Template-backed emitter for one virtual module id
#[derive(Debug)]
pub struct ModuleEmitter {
    tera: Tera,
    module_id: String,
    endpoint_url: String,
}

impl ModuleEmitter {
    pub fn new(module_id: impl Into<String>, endpoint_url: impl Into<String>) -> EmitResult<Self> {
        let mut tera = Tera::default();
        tera.autoescape_on(vec![]);
        tera.add_raw_templates(vec![
            (MODULE_TEMPLATE, include_str!("templates/module.js.tera")),
            (DECLARATION_TEMPLATE, include_str!("templates/app-version.d.ts.tera")),
        ])?;

        Ok(Self {
            tera,
            module_id: module_id.into(),
            endpoint_url: endpoint_url.into(),
        })
    }

    pub fn module_id(&self) -> &str {
        &self.module_id
    }

    pub fn endpoint_url(&self) -> &str {
        &self.endpoint_url
    }

    /// Module source whose default export is the artifact object
    pub fn emit_module(&self, artifact_text: &str) -> EmitResult<String> {
        let parsed: serde_json::Value =
            serde_json::from_str(artifact_text).map_err(|e| EmitError::InvalidArtifact {
                message: e.to_string(),
            })?;
        if !parsed.is_object() {
            return Err(EmitError::InvalidArtifact {
                message: "top-level value must be an object".to_string(),
            });
        }

        let mut context = Context::new();
        context.insert("artifact", artifact_text.trim_end());
        context.insert("endpoint_url", &json_string(&self.endpoint_url));
        Ok(self.tera.render(MODULE_TEMPLATE, &context)?)
    }

    /// `declare module` text describing the module's exports
    pub fn emit_type_description(
        &self,
        selection: &FieldSelection,
        extra: &ExtraFields,
    ) -> EmitResult<String> {
        let mut context = Context::new();
        context.insert("module_id", &json_string(&self.module_id));
        context.insert("fields", &declared_fields(selection, extra));
        Ok(self.tera.render(DECLARATION_TEMPLATE, &context)?)
    }
}

/// Pull the default-export literal back out of an emitted module
pub fn default_export_literal(module_source: &str) -> Option<&str> {
    const START: &str = "/* verstamp:snapshot */\nconst version = Object.freeze(";
    const END: &str = ");\n/* verstamp:end */";
    let begin = module_source.find(START)? + START.len();
    let len = module_source[begin..].find(END)?;
    Some(&module_source[begin..begin + len])
}
