use super::{ConsolidationTask, UsageGroup};
use checklist_core::{ChecklistResult, Issue, LinneanNameUsage, NameRelation, NomRelType, StoreSession};
use tracing::{debug, warn};

impl ConsolidationTask<'_> {
    /// Create the nomenclatural relations implied by a group.
    ///
    /// Existing relations are left alone, so running this twice has no further effect.
    pub fn persist_relations(&mut self, group: &UsageGroup) -> ChecklistResult<()> {
        let ctx = self.ctx;
        let mut session = ctx.store.session()?;

        if let Some(bas) = group.basionym() {
            for r in group.recombinations() {
                let created = self.create_relation(&mut *session, r, bas, NomRelType::Basionym)?;
                if created && ctx.config.flag_derived_basionyms {
                    session.add_issue(&ctx.key(&r.id), Issue::BasionymDerived)?;
                }
            }
            for v in group.basionym_variations() {
                self.create_relation(&mut *session, bas, v, NomRelType::SpellingCorrection)?;
            }
            self.flag_multiple_basionyms(&mut *session, bas, group.basionym_variations())?;
        } else if let [first, others @ ..] = group.recombinations() {
            for r in others {
                self.create_relation(&mut *session, r, first, NomRelType::Homotypic)?;
            }
        }

        if let Some(based_on) = group.based_on() {
            if let Some(primary) = group.primary() {
                self.create_relation(&mut *session, primary, based_on, NomRelType::BasedOn)?;
            }
            for v in group.based_on_variations() {
                self.create_relation(&mut *session, based_on, v, NomRelType::SpellingCorrection)?;
            }
        }
        session.commit()
    }

    /// Returns true if a new relation was created
    fn create_relation(
        &mut self,
        session: &mut (dyn StoreSession + '_),
        from: &LinneanNameUsage,
        to: &LinneanNameUsage,
        rel_type: NomRelType,
    ) -> ChecklistResult<bool> {
        let (Some(from_id), Some(to_id)) = (from.name_id.as_deref(), to.name_id.as_deref()) else {
            debug!("Skip {} relation without name ids: {} -> {}", rel_type, from, to);
            return Ok(false);
        };
        if from_id == to_id {
            return Ok(false);
        }
        let rel = NameRelation::new(self.ctx.dataset_key, from_id, to_id, rel_type, self.ctx.config.user_key);
        if session.relation_exists(&rel)? {
            return Ok(false);
        }
        debug!("Create {} relation {} -> {}", rel_type, from.label(), to.label());
        session.create_relation(rel)?;
        self.stats.relation_created(rel_type);
        Ok(true)
    }

    /// Flag the basionym and all variations that are distinct original
    /// combinations rather than duplicates of the basionym
    fn flag_multiple_basionyms(
        &mut self,
        session: &mut (dyn StoreSession + '_),
        basionym: &LinneanNameUsage,
        variations: &[LinneanNameUsage],
    ) -> ChecklistResult<()> {
        let distinct: Vec<&LinneanNameUsage> = variations
            .iter()
            .filter(|v| !is_duplicate(basionym, v))
            .collect();
        if distinct.is_empty() {
            return Ok(());
        }
        warn!(
            "Multiple basionyms found for {}: {}",
            basionym.label(),
            distinct.iter().map(|v| v.label()).collect::<Vec<_>>().join("; ")
        );
        session.add_issue(&self.ctx.key(&basionym.id), Issue::MultipleBasionyms)?;
        for v in distinct {
            session.add_issue(&self.ctx.key(&v.id), Issue::MultipleBasionyms)?;
        }
        self.stats.multiple_basionyms += 1;
        Ok(())
    }
}

/// Same combination, possibly spelled or authored slightly differently
fn is_duplicate(a: &LinneanNameUsage, b: &LinneanNameUsage) -> bool {
    a.rank == b.rank
        && a.genus == b.genus
        && (!a.is_trinomial() || a.specific_epithet == b.specific_epithet)
}
