//! Draft editing of the royalty schedule.
//!
//! The schedule is copied out of the record when the editor opens. Nothing reaches
//! the record until the draft is committed through the store.

use uuid::Uuid;

use crate::errors::{FormError, Result};
use crate::record::{DateScheme, RoyaltySplit, VolumeIdentifier, VolumeRule};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoyaltyEditor {
    draft: Vec<DateScheme>,
}

/// Which side of a volume rule an identifier update targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolumeBound {
    Start,
    End,
}

impl RoyaltyEditor {
    pub fn open(schedule: &[DateScheme]) -> Self {
        Self {
            draft: schedule.to_vec(),
        }
    }

    pub fn schemes(&self) -> &[DateScheme] {
        &self.draft
    }

    pub fn into_schedule(self) -> Vec<DateScheme> {
        self.draft
    }

    pub fn add_scheme(&mut self) -> Uuid {
        let scheme = DateScheme::blank();
        let id = scheme.id;
        self.draft.push(scheme);
        id
    }

    pub fn remove_scheme(&mut self, scheme_id: Uuid) -> bool {
        let before = self.draft.len();
        self.draft.retain(|scheme| scheme.id != scheme_id);
        self.draft.len() != before
    }

    pub fn set_dates(&mut self, scheme_id: Uuid, start: &str, end: &str) -> Result<()> {
        let scheme = self.scheme_mut(scheme_id)?;
        scheme.start_date = start.to_string();
        scheme.end_date = end.to_string();
        Ok(())
    }

    pub fn add_rule(&mut self, scheme_id: Uuid) -> Result<Uuid> {
        let rule = VolumeRule::new();
        let id = rule.id;
        self.scheme_mut(scheme_id)?.volume_rules.push(rule);
        Ok(id)
    }

    pub fn remove_rule(&mut self, scheme_id: Uuid, rule_id: Uuid) -> Result<bool> {
        let rules = &mut self.scheme_mut(scheme_id)?.volume_rules;
        let before = rules.len();
        rules.retain(|rule| rule.id != rule_id);
        Ok(rules.len() != before)
    }

    pub fn set_volume(
        &mut self,
        scheme_id: Uuid,
        rule_id: Uuid,
        bound: VolumeBound,
        identifier: VolumeIdentifier,
    ) -> Result<()> {
        let rule = self.rule_mut(scheme_id, rule_id)?;
        match bound {
            VolumeBound::Start => rule.start_volume_info = identifier,
            VolumeBound::End => rule.end_volume_info = identifier,
        }
        Ok(())
    }

    pub fn add_split(&mut self, scheme_id: Uuid, rule_id: Uuid) -> Result<Uuid> {
        let split = RoyaltySplit::new();
        let id = split.id;
        self.rule_mut(scheme_id, rule_id)?.royalty_splits.push(split);
        Ok(id)
    }

    pub fn remove_split(&mut self, scheme_id: Uuid, rule_id: Uuid, split_id: Uuid) -> Result<bool> {
        let splits = &mut self.rule_mut(scheme_id, rule_id)?.royalty_splits;
        let before = splits.len();
        splits.retain(|split| split.id != split_id);
        Ok(splits.len() != before)
    }

    pub fn update_split(
        &mut self,
        scheme_id: Uuid,
        rule_id: Uuid,
        split_id: Uuid,
        beneficiary: &str,
        percentage: &str,
    ) -> Result<()> {
        let split = self
            .rule_mut(scheme_id, rule_id)?
            .royalty_splits
            .iter_mut()
            .find(|split| split.id == split_id)
            .ok_or_else(|| FormError::UnknownField(format!("royalty split {split_id}")))?;
        split.beneficiary = beneficiary.to_string();
        split.percentage = percentage.to_string();
        Ok(())
    }

    fn scheme_mut(&mut self, scheme_id: Uuid) -> Result<&mut DateScheme> {
        self.draft
            .iter_mut()
            .find(|scheme| scheme.id == scheme_id)
            .ok_or_else(|| FormError::UnknownField(format!("royalty scheme {scheme_id}")))
    }

    fn rule_mut(&mut self, scheme_id: Uuid, rule_id: Uuid) -> Result<&mut VolumeRule> {
        self.scheme_mut(scheme_id)?
            .rule_mut(rule_id)
            .ok_or_else(|| FormError::UnknownField(format!("volume rule {rule_id}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draft_is_detached_from_the_source() {
        let source = vec![DateScheme::blank()];
        let mut editor = RoyaltyEditor::open(&source);
        editor.add_scheme();
        assert_eq!(source.len(), 1);
        assert_eq!(editor.schemes().len(), 2);
    }

    #[test]
    fn every_level_gets_fresh_identifiers() {
        let mut editor = RoyaltyEditor::open(&[]);
        let scheme = editor.add_scheme();
        let rule = editor.add_rule(scheme).unwrap();
        let split = editor.add_split(scheme, rule).unwrap();
        let ids = [
            scheme,
            editor.schemes()[0].volume_rules[0].id,
            rule,
            editor.schemes()[0].volume_rules[1].royalty_splits[0].id,
            split,
        ];
        for (i, a) in ids.iter().enumerate() {
            for b in &ids[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn splits_update_and_remove() {
        let mut editor = RoyaltyEditor::open(&[DateScheme::blank()]);
        let scheme = editor.schemes()[0].id;
        let rule = editor.schemes()[0].volume_rules[0].id;
        let first = editor.schemes()[0].volume_rules[0].royalty_splits[0].id;
        let second = editor.add_split(scheme, rule).unwrap();

        editor.update_split(scheme, rule, first, "A", "60").unwrap();
        editor.update_split(scheme, rule, second, "B", "50").unwrap();
        assert!(editor.remove_split(scheme, rule, second).unwrap());

        let splits = &editor.schemes()[0].volume_rules[0].royalty_splits;
        assert_eq!(splits.len(), 1);
        assert_eq!(splits[0].beneficiary, "A");
    }

    #[test]
    fn unknown_ids_are_reported() {
        let mut editor = RoyaltyEditor::open(&[]);
        assert!(matches!(
            editor.add_rule(Uuid::new_v4()),
            Err(FormError::UnknownField(_))
        ));
        assert!(!editor.remove_scheme(Uuid::new_v4()));
    }
}
