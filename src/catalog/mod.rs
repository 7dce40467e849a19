//! Field descriptor catalogs: which sections a contract line has, which fields each
//! section holds, which of them are required, and which sibling fields can be
//! bulk-applied together.

pub mod academic;
pub mod descriptor;
pub mod library;

use serde_json::Value;

use crate::errors::{FormError, Result};
use crate::form::composite::{self, Composite};
use crate::record::{literal_path, path, template, ContractLine, FieldPath};

pub use descriptor::{
    CascadeOptions, CompositeKind, FieldDescriptor, FieldKind, LayoutHint, SectionFields,
    Visibility,
};

/// An ordered block of fields rendered under one heading.
#[derive(Debug, Clone)]
pub struct Section {
    pub id: &'static str,
    pub label: &'static str,
    pub fields: Vec<FieldDescriptor>,
}

impl Section {
    pub fn new(id: &'static str, label: &'static str, fields: Vec<FieldDescriptor>) -> Self {
        Self { id, label, fields }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionSummary {
    pub id: &'static str,
    pub label: &'static str,
}

/// A required path together with the label shown when it is missing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequiredRule {
    pub path: FieldPath,
    pub label: String,
}

/// Structurally identical `{selected, details}` fields that share a bulk selector.
#[derive(Debug, Clone)]
pub struct BulkGroup {
    pub id: &'static str,
    pub label: &'static str,
    pub paths: Vec<FieldPath>,
}

impl BulkGroup {
    pub fn new(
        id: &'static str,
        label: &'static str,
        section_key: &'static str,
        items: &[(&'static str, &'static str)],
    ) -> Self {
        let paths = items
            .iter()
            .map(|(key, _)| literal_path(&format!("{section_key}.{key}")))
            .collect();
        Self { id, label, paths }
    }
}

/// Raw catalog contents before they are checked against the record template.
pub struct CatalogDefinition {
    pub sections: Vec<Section>,
    pub required: Vec<&'static str>,
    pub bulk_groups: Vec<BulkGroup>,
}

/// The validated, read-only catalog for one contract line.
#[derive(Debug, Clone)]
pub struct Catalog {
    line: ContractLine,
    sections: Vec<Section>,
    required: Vec<RequiredRule>,
    bulk_groups: Vec<BulkGroup>,
}

impl Catalog {
    /// Builds the catalog for `line` and checks it against the line's blank template.
    pub fn load(line: ContractLine) -> Result<Self> {
        let definition = match line {
            ContractLine::Academic => academic::definition(),
            ContractLine::LibraryServices => library::definition(),
        };
        let catalog = Self::from_definition(line, definition, &template::blank(line))?;
        tracing::debug!(
            line = line.slug(),
            sections = catalog.sections.len(),
            required = catalog.required.len(),
            "catalog loaded"
        );
        Ok(catalog)
    }

    pub fn from_definition(
        line: ContractLine,
        definition: CatalogDefinition,
        template: &Value,
    ) -> Result<Self> {
        let CatalogDefinition {
            mut sections,
            required,
            bulk_groups,
        } = definition;

        for section in &sections {
            for field in &section.fields {
                check_field_shape(field, template)?;
            }
        }
        for group in &bulk_groups {
            for member in &group.paths {
                ensure_present(template, member)?;
            }
        }

        let mut rules = Vec::with_capacity(required.len());
        for raw in required {
            let rule_path = FieldPath::parse(raw)?;
            ensure_present(template, &rule_path)?;
            let label = mark_required(&mut sections, &rule_path)
                .ok_or_else(|| FormError::UnknownField(raw.to_string()))?;
            rules.push(RequiredRule {
                path: rule_path,
                label,
            });
        }

        Ok(Self {
            line,
            sections,
            required: rules,
            bulk_groups,
        })
    }

    pub fn line(&self) -> ContractLine {
        self.line
    }

    pub fn sections_in_order(&self) -> Vec<SectionSummary> {
        self.sections
            .iter()
            .map(|section| SectionSummary {
                id: section.id,
                label: section.label,
            })
            .collect()
    }

    pub fn fields_for(&self, section_id: &str) -> Result<&[FieldDescriptor]> {
        self.section(section_id)
            .map(|section| section.fields.as_slice())
            .ok_or_else(|| FormError::UnknownSection(section_id.to_string()))
    }

    pub fn section(&self, section_id: &str) -> Option<&Section> {
        self.sections.iter().find(|section| section.id == section_id)
    }

    pub fn required_rules(&self) -> &[RequiredRule] {
        &self.required
    }

    pub fn bulk_groups(&self) -> &[BulkGroup] {
        &self.bulk_groups
    }

    pub fn bulk_group(&self, id: &str) -> Option<&BulkGroup> {
        self.bulk_groups.iter().find(|group| group.id == id)
    }

    /// The most specific descriptor covering `path`, searching group members too.
    pub fn descriptor_for(&self, path: &FieldPath) -> Option<&FieldDescriptor> {
        self.sections
            .iter()
            .flat_map(|section| section.fields.iter())
            .filter(|field| field.covers(path))
            .map(|field| {
                field
                    .sub_fields()
                    .iter()
                    .find(|member| member.covers(path))
                    .unwrap_or(field)
            })
            .max_by_key(|field| field.path.segments().len())
    }

    /// Human label for `path`, qualified with the group label for group members.
    pub fn label_for(&self, path: &FieldPath) -> Option<String> {
        let field = self
            .sections
            .iter()
            .flat_map(|section| section.fields.iter())
            .find(|field| field.covers(path))?;
        match field.sub_fields().iter().find(|member| member.covers(path)) {
            Some(member) => Some(format!("{} - {}", field.label, member.label)),
            None => Some(field.label.to_string()),
        }
    }

    fn composites(&self) -> impl Iterator<Item = Composite> + '_ {
        self.sections
            .iter()
            .flat_map(|section| section.fields.iter())
            .filter_map(|field| match field.kind {
                FieldKind::Composite(kind) => Composite::at(kind, &field.path).ok(),
                _ => None,
            })
    }

    /// The composite owning `path` as one of its members, or lying underneath one.
    pub fn composite_for(&self, path: &FieldPath) -> Option<Composite> {
        self.composites().find(|composite| {
            composite.members().map_or(false, |members| {
                members
                    .iter()
                    .any(|member| path.segments().starts_with(member.segments()))
            })
        })
    }

    /// Composites with members strictly underneath `path`, i.e. those a write at
    /// `path` replaces wholesale.
    pub fn composites_within(&self, path: &FieldPath) -> Vec<Composite> {
        self.composites()
            .filter(|composite| {
                composite.members().map_or(false, |members| {
                    members.iter().any(|member| {
                        member.segments().len() > path.segments().len()
                            && member.segments().starts_with(path.segments())
                    })
                })
            })
            .collect()
    }

    pub fn composite(&self, kind: CompositeKind) -> Option<Composite> {
        self.composites().find(|composite| composite.kind() == kind)
    }

    /// Section holding the field that covers `path`.
    pub fn section_of(&self, path: &FieldPath) -> Option<&Section> {
        let anchor = self.composite_for(path).map(|owner| owner.anchor().clone());
        let target = anchor.as_ref().unwrap_or(path);
        self.sections
            .iter()
            .find(|section| section.fields.iter().any(|field| field.covers(target)))
    }

    /// Path of the required field carrying `label`, used to jump to a missing field.
    pub fn path_for_label(&self, label: &str) -> Option<&FieldPath> {
        self.required
            .iter()
            .find(|rule| rule.label == label)
            .map(|rule| &rule.path)
    }
}

fn ensure_present(template: &Value, target: &FieldPath) -> Result<()> {
    path::get(template, target)
        .map(|_| ())
        .ok_or_else(|| FormError::ShapeDrift(target.to_string()))
}

fn check_field_shape(field: &FieldDescriptor, template: &Value) -> Result<()> {
    ensure_present(template, &field.path)?;
    for member in field.sub_fields() {
        ensure_present(template, &member.path)?;
    }
    if let FieldKind::Composite(kind) = field.kind {
        for member in composite::member_paths(kind, &field.path)? {
            ensure_present(template, &member)?;
        }
    }
    Ok(())
}

fn mark_required(sections: &mut [Section], rule_path: &FieldPath) -> Option<String> {
    let field = sections
        .iter_mut()
        .flat_map(|section| section.fields.iter_mut())
        .find(|field| field.covers(rule_path))?;
    let parent_label = field.label;
    if let FieldKind::Group(members) = &mut field.kind {
        if let Some(member) = members.iter_mut().find(|member| member.covers(rule_path)) {
            member.required = true;
            return Some(format!("{} - {}", parent_label, member.label));
        }
    }
    field.required = true;
    Some(field.label.to_string())
}
