use std::fmt;

use crate::record::{literal_path, ContractRecord, FieldPath};

/// Predicate over the whole record deciding whether a field is shown.
pub type Visibility = fn(&ContractRecord) -> bool;

/// Option sets keyed by a main category, used by cascading selects.
pub type CascadeOptions = &'static [(&'static str, &'static [&'static str])];

/// Composite controls whose value shape and edit rules live in `form::composite`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompositeKind {
    ThirdPartyPlatform,
    DiscoverySystem,
    NclClause,
    Damages,
    RoyaltySchedule,
    Remittance,
    Contacts,
    ScanFile,
}

/// The control a descriptor renders as, together with its option data.
#[derive(Debug, Clone)]
pub enum FieldKind {
    Text,
    TextArea,
    Date,
    SingleChoice(&'static [&'static str]),
    Checkboxes(&'static [&'static str]),
    Tags,
    Cascading(CascadeOptions),
    PercentageNote,
    ChoiceWithOther,
    Group(Vec<FieldDescriptor>),
    Composite(CompositeKind),
}

impl FieldKind {
    pub fn name(&self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::TextArea => "textarea",
            FieldKind::Date => "date",
            FieldKind::SingleChoice(_) => "single-choice",
            FieldKind::Checkboxes(_) => "checkboxes",
            FieldKind::Tags => "tags",
            FieldKind::Cascading(_) => "cascading-select",
            FieldKind::PercentageNote => "percentage-note",
            FieldKind::ChoiceWithOther => "choice-with-other",
            FieldKind::Group(_) => "group",
            FieldKind::Composite(_) => "composite",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LayoutHint {
    #[default]
    Regular,
    FullWidth,
}

/// Static description of one editable slot in a record.
#[derive(Clone)]
pub struct FieldDescriptor {
    pub id: &'static str,
    pub label: &'static str,
    pub path: FieldPath,
    pub kind: FieldKind,
    pub required: bool,
    pub visibility: Option<Visibility>,
    pub layout: LayoutHint,
}

impl fmt::Debug for FieldDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("path", &self.path.as_str())
            .field("label", &self.label)
            .field("kind", &self.kind)
            .field("required", &self.required)
            .field("conditional", &self.visibility.is_some())
            .field("layout", &self.layout)
            .finish()
    }
}

impl FieldDescriptor {
    pub fn new(path: &str, id: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            id,
            label,
            path: literal_path(path),
            kind,
            required: false,
            visibility: None,
            layout: LayoutHint::Regular,
        }
    }

    pub fn full_width(mut self) -> Self {
        self.layout = LayoutHint::FullWidth;
        self
    }

    pub fn visible_when(mut self, predicate: Visibility) -> Self {
        self.visibility = Some(predicate);
        self
    }

    pub fn is_visible(&self, record: &ContractRecord) -> bool {
        self.visibility.map_or(true, |predicate| predicate(record))
    }

    /// Options offered by choice-like controls, empty for the rest.
    pub fn options(&self) -> Vec<&'static str> {
        match &self.kind {
            FieldKind::SingleChoice(options) | FieldKind::Checkboxes(options) => options.to_vec(),
            FieldKind::Cascading(options) => options.iter().map(|(main, _)| *main).collect(),
            _ => Vec::new(),
        }
    }

    pub fn sub_fields(&self) -> &[FieldDescriptor] {
        match &self.kind {
            FieldKind::Group(fields) => fields,
            _ => &[],
        }
    }

    /// True when `path` is this field or lies underneath it.
    pub fn covers(&self, path: &FieldPath) -> bool {
        path.segments().starts_with(self.path.segments())
    }
}

/// Builds descriptors for one record section so each field only names its own key.
pub struct SectionFields {
    prefix: Option<&'static str>,
}

impl SectionFields {
    pub fn under(prefix: &'static str) -> Self {
        Self {
            prefix: Some(prefix),
        }
    }

    pub fn root() -> Self {
        Self { prefix: None }
    }

    pub fn field(&self, id: &'static str, label: &'static str, kind: FieldKind) -> FieldDescriptor {
        let path = match self.prefix {
            Some(prefix) => format!("{prefix}.{id}"),
            None => id.to_string(),
        };
        FieldDescriptor::new(&path, id, label, kind)
    }

    pub fn text(&self, id: &'static str, label: &'static str) -> FieldDescriptor {
        self.field(id, label, FieldKind::Text)
    }

    pub fn text_area(&self, id: &'static str, label: &'static str) -> FieldDescriptor {
        self.field(id, label, FieldKind::TextArea).full_width()
    }

    pub fn date(&self, id: &'static str, label: &'static str) -> FieldDescriptor {
        self.field(id, label, FieldKind::Date)
    }

    pub fn choice(
        &self,
        id: &'static str,
        label: &'static str,
        options: &'static [&'static str],
    ) -> FieldDescriptor {
        self.field(id, label, FieldKind::SingleChoice(options))
    }

    pub fn tags(&self, id: &'static str, label: &'static str) -> FieldDescriptor {
        self.field(id, label, FieldKind::Tags).full_width()
    }

    pub fn percentage(&self, id: &'static str, label: &'static str) -> FieldDescriptor {
        self.field(id, label, FieldKind::PercentageNote)
    }

    pub fn with_other(&self, id: &'static str, label: &'static str) -> FieldDescriptor {
        self.field(id, label, FieldKind::ChoiceWithOther)
    }

    pub fn composite(
        &self,
        id: &'static str,
        label: &'static str,
        kind: CompositeKind,
    ) -> FieldDescriptor {
        self.field(id, label, FieldKind::Composite(kind)).full_width()
    }

    /// A labelled group whose members are addressed relative to `id`.
    pub fn group(
        &self,
        id: &'static str,
        label: &'static str,
        members: &[(&'static str, &'static str)],
    ) -> FieldDescriptor {
        let parent = self.field(id, label, FieldKind::Text);
        let fields = members
            .iter()
            .map(|&(member, member_label)| {
                let path = format!("{}.{}", parent.path, member);
                FieldDescriptor::new(&path, member, member_label, FieldKind::Text)
            })
            .collect();
        FieldDescriptor {
            kind: FieldKind::Group(fields),
            ..parent
        }
    }
}
