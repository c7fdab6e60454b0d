//! Model and field metadata used by the template configuration screen.
//!
//! The host hands over every model and field definition of the project; a
//! [`SchemaCatalog`] indexes them to offer placeholder suggestions and to
//! point out template tokens that can never resolve.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::template::{parse_tokens, TokenRef};

/// Field types as reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    String,
    Slug,
    Integer,
    Float,
    Link,
    Text,
    Boolean,
    Date,
    DateTime,
    File,
    Gallery,
    Links,
    Json,
    #[serde(other)]
    Other,
}

impl FieldType {
    /// Types a placeholder may reference.
    pub fn is_supported(&self) -> bool {
        matches!(
            self,
            FieldType::String
                | FieldType::Slug
                | FieldType::Integer
                | FieldType::Float
                | FieldType::Link
        )
    }

    /// Numbers are offered as placeholders but only text is extracted, so
    /// these always render as `""`.
    pub fn renders_empty(&self) -> bool {
        matches!(self, FieldType::Integer | FieldType::Float)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDefinition {
    pub id: String,
    pub api_key: String,
    pub field_type: FieldType,
    /// Model the field belongs to
    pub model_id: String,
    /// Models a link field may point at, empty for other types
    #[serde(default)]
    pub related_model_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelDefinition {
    pub id: String,
    pub api_key: String,
}

/// A placeholder offered while editing a template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenSuggestion {
    /// Token body, without braces
    pub token: String,
    /// Field the token ends up reading
    pub field_id: String,
    pub field_type: FieldType,
}

impl TokenSuggestion {
    /// The token wrapped in braces, ready to insert into a template.
    pub fn placeholder(&self) -> String {
        format!("{{{}}}", self.token)
    }
}

/// A token that will always resolve to an empty string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateIssue {
    /// Neither one segment nor three
    Malformed { token: String },
    /// No supported field with that api key on the model
    UnknownField { token: String, api_key: String },
    /// First segment of a linked token is not a link field
    NotALink { token: String, api_key: String },
    /// Alias names none of the link's related models
    UnknownAlias { token: String, alias: String },
    /// Field exists but holds a number, which renders as nothing
    NumericField { token: String, api_key: String },
}

/// Index over the project's models and fields.
#[derive(Debug, Clone, Default)]
pub struct SchemaCatalog {
    models: HashMap<String, ModelDefinition>,
    fields: Vec<FieldDefinition>,
}

impl SchemaCatalog {
    pub fn new(
        models: impl IntoIterator<Item = ModelDefinition>,
        fields: impl IntoIterator<Item = FieldDefinition>,
    ) -> Self {
        Self {
            models: models.into_iter().map(|m| (m.id.clone(), m)).collect(),
            fields: fields.into_iter().collect(),
        }
    }

    pub fn model(&self, model_id: &str) -> Option<&ModelDefinition> {
        self.models.get(model_id)
    }

    /// Supported fields of a model, sorted by api key.
    pub fn supported_fields(&self, model_id: &str) -> Vec<&FieldDefinition> {
        let mut fields: Vec<_> = self
            .fields
            .iter()
            .filter(|f| f.model_id == model_id && f.field_type.is_supported())
            .collect();
        fields.sort_by(|a, b| a.api_key.cmp(&b.api_key));
        fields
    }

    fn supported_field(&self, model_id: &str, api_key: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|f| {
            f.model_id == model_id && f.api_key == api_key && f.field_type.is_supported()
        })
    }

    /// Related models of a link field that exist in the catalog, in the
    /// order the field lists them.
    fn related_models<'a>(
        &'a self,
        link: &'a FieldDefinition,
    ) -> impl Iterator<Item = &'a ModelDefinition> + 'a {
        link.related_model_ids
            .iter()
            .filter_map(|id| self.models.get(id))
    }

    /// Placeholders available for records of `model_id`.
    ///
    /// Plain fields yield `{api_key}`. A link field yields
    /// `{link.alias.remote}` for every supported non-link field of each
    /// related model, `alias` being that model's api key.
    ///
    /// Integer and float fields are listed too, but render as `""`; see
    /// [`FieldType::renders_empty`] and [`TemplateIssue::NumericField`].
    pub fn template_suggestions(&self, model_id: &str) -> Vec<TokenSuggestion> {
        let mut suggestions = Vec::new();

        for field in self.supported_fields(model_id) {
            if field.field_type != FieldType::Link {
                suggestions.push(TokenSuggestion {
                    token: field.api_key.clone(),
                    field_id: field.id.clone(),
                    field_type: field.field_type,
                });
                continue;
            }

            for related in self.related_models(field) {
                for remote in self.supported_fields(&related.id) {
                    if remote.field_type == FieldType::Link {
                        continue;
                    }
                    suggestions.push(TokenSuggestion {
                        token: format!("{}.{}.{}", field.api_key, related.api_key, remote.api_key),
                        field_id: remote.id.clone(),
                        field_type: remote.field_type,
                    });
                }
            }
        }

        suggestions
    }

    /// Tokens of `template` that can never resolve for records of
    /// `model_id`. Each distinct token is reported at most once.
    pub fn template_issues(&self, template: &str, model_id: &str) -> Vec<TemplateIssue> {
        let mut seen = Vec::new();
        let mut issues = Vec::new();

        for token in parse_tokens(template) {
            if seen.contains(&token) {
                continue;
            }
            seen.push(token);

            if let Some(issue) = self.check_token(token, model_id) {
                issues.push(issue);
            }
        }

        issues
    }

    fn check_token(&self, token: &str, model_id: &str) -> Option<TemplateIssue> {
        match TokenRef::parse(token) {
            TokenRef::Simple(api_key) => match self.supported_field(model_id, api_key) {
                Some(field) => numeric_issue(token, field),
                None => Some(TemplateIssue::UnknownField {
                    token: token.to_string(),
                    api_key: api_key.to_string(),
                }),
            },
            TokenRef::Linked {
                local_field,
                model_alias,
                remote_field,
            } => {
                let Some(link) = self.supported_field(model_id, local_field) else {
                    return Some(TemplateIssue::UnknownField {
                        token: token.to_string(),
                        api_key: local_field.to_string(),
                    });
                };
                if link.field_type != FieldType::Link {
                    return Some(TemplateIssue::NotALink {
                        token: token.to_string(),
                        api_key: local_field.to_string(),
                    });
                }
                let Some(related) = self
                    .related_models(link)
                    .find(|m| m.api_key == model_alias)
                else {
                    return Some(TemplateIssue::UnknownAlias {
                        token: token.to_string(),
                        alias: model_alias.to_string(),
                    });
                };
                match self.supported_field(&related.id, remote_field) {
                    Some(remote) => numeric_issue(token, remote),
                    None => Some(TemplateIssue::UnknownField {
                        token: token.to_string(),
                        api_key: remote_field.to_string(),
                    }),
                }
            }
            TokenRef::Malformed => Some(TemplateIssue::Malformed {
                token: token.to_string(),
            }),
        }
    }
}

fn numeric_issue(token: &str, field: &FieldDefinition) -> Option<TemplateIssue> {
    field
        .field_type
        .renders_empty()
        .then(|| TemplateIssue::NumericField {
            token: token.to_string(),
            api_key: field.api_key.clone(),
        })
}
