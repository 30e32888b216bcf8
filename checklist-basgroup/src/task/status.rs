use super::{ConsolidationTask, UsageGroup};
use checklist_core::{
    ChecklistResult, Issue, LinneanNameUsage, Rank, StoreSession, TaxonomicStatus, TreeTraversal,
    UsageKey,
};
use std::cmp::Ordering;
use std::collections::HashSet;
use tracing::{debug, info, warn};

impl ConsolidationTask<'_> {
    /// Select the most trusted usage of a group.
    ///
    /// Only members from the most trusted source compete. If these point to
    /// several accepted usages that cannot be told apart, all accepted members
    /// are flagged as unresolved and no primary usage is returned.
    pub fn find_primary_usage(&mut self, group: &UsageGroup) -> ChecklistResult<Option<LinneanNameUsage>> {
        let members: Vec<LinneanNameUsage> = group.all().into_iter().map(|u| self.current(u)).collect();
        if members.len() <= 1 {
            return Ok(members.into_iter().next());
        }

        let min_priority = members.iter().map(|u| self.ctx.priority(u)).min().unwrap_or(0);
        let mut candidates: Vec<LinneanNameUsage> = members
            .iter()
            .filter(|u| self.ctx.priority(u) == min_priority)
            .cloned()
            .collect();
        if candidates.len() == 1 {
            return Ok(candidates.pop());
        }

        let mut accepted: Vec<LinneanNameUsage> = Vec::new();
        for c in &candidates {
            if let Some(acc) = self.accepted_usage(c)? {
                if !accepted.iter().any(|a| a.id == acc.id) {
                    accepted.push(acc);
                }
            }
        }
        if accepted.len() > 1 {
            return match self.disambiguate(group, &accepted) {
                Some(primary) => Ok(Some(primary)),
                None => {
                    self.flag_unresolved(&members)?;
                    Ok(None)
                }
            };
        }

        // all candidates share the same accepted usage
        candidates.sort_by_key(|u| (u.status.map(|s| s.preference()).unwrap_or(usize::MAX), u.rank));
        Ok(candidates.into_iter().next())
    }

    fn disambiguate(&self, group: &UsageGroup, accepted: &[LinneanNameUsage]) -> Option<LinneanNameUsage> {
        let strict: Vec<&LinneanNameUsage> = accepted
            .iter()
            .filter(|a| a.status == Some(TaxonomicStatus::Accepted))
            .collect();
        if strict.len() <= 1 {
            return strict.first().map(|a| (*a).clone());
        }
        // an autonym is redundant next to its own species
        let reduced: Vec<&LinneanNameUsage> = strict
            .iter()
            .copied()
            .filter(|a| !(a.is_autonym() && strict.iter().any(|s| is_species_of(s, a))))
            .collect();
        if reduced.len() == 1 {
            return Some(reduced[0].clone());
        }
        let mut matching = reduced.into_iter().filter(|a| {
            a.terminal_epithet()
                .map(|e| self.ctx.normalizer.normalize_epithet(e) == group.epithet())
                .unwrap_or(false)
        });
        match (matching.next(), matching.next()) {
            (Some(primary), None) => Some(primary.clone()),
            _ => None,
        }
    }

    fn flag_unresolved(&mut self, members: &[LinneanNameUsage]) -> ChecklistResult<()> {
        let ctx = self.ctx;
        let mut session = ctx.store.session()?;
        for u in members.iter().filter(|u| u.is_taxon()) {
            session.add_issue(&ctx.key(&u.id), Issue::HomotypicConsolidationUnresolved)?;
        }
        session.commit()?;
        self.stats.unresolved_groups += 1;
        warn!(
            "Unresolved homotypic group with several accepted names in {}: {}",
            self.taxon.name,
            members.iter().map(|u| u.label()).collect::<Vec<_>>().join("; ")
        );
        Ok(())
    }

    /// Make sure a group has at most one accepted usage.
    ///
    /// Members less trusted than the primary usage become synonyms of the
    /// primary accepted usage, equally trusted ones stay untouched and more
    /// trusted ones are flagged. Ancestors of the primary accepted usage are
    /// never touched.
    pub fn consolidate(&mut self, group: &UsageGroup) -> ChecklistResult<()> {
        if group.size() <= 1 {
            return Ok(());
        }
        let Some(primary) = self.find_primary_usage(group)? else {
            return Ok(());
        };
        let primary_acc = if primary.is_taxon() {
            primary.clone()
        } else {
            match self.accepted_usage(&primary)? {
                Some(acc) if acc.is_taxon() => acc,
                _ => {
                    warn!("No accepted usage found for primary synonym {}", primary);
                    return Ok(());
                }
            }
        };
        let ctx = self.ctx;
        let effective = ctx.priority(&primary).min(ctx.priority(&primary_acc));
        let ancestors: HashSet<String> = {
            let session = ctx.store.session()?;
            session.classification_ids(&ctx.key(&primary_acc.id))?.into_iter().collect()
        };
        debug!(
            "Consolidate homotypic group {} with primary {} accepted as {}",
            group.epithet(),
            primary,
            primary_acc
        );

        let mut unresolved = false;
        for member in group.all() {
            let u = self.current(member);
            if u.id == primary.id || u.id == primary_acc.id {
                continue;
            }
            if ancestors.contains(&u.id) {
                debug!("Exclude ancestor {} from consolidation of {}", u.label(), primary_acc.label());
                continue;
            }
            if u.is_synonym() && u.parent_id.as_deref() == Some(primary_acc.id.as_str()) {
                continue;
            }
            match ctx.priority(&u).cmp(&effective) {
                Ordering::Greater => {
                    let mut session = ctx.store.session()?;
                    if self.convert_to_synonym(
                        &mut *session,
                        &u,
                        &primary_acc,
                        Some(Issue::HomotypicConsolidation),
                    )? && is_redundant(&*session, &u, &primary_acc, ctx.key(&primary_acc.id))?
                    {
                        info!("Delete redundant synonym {} of {}", u, primary_acc);
                        session.delete_usage(&ctx.key(&u.id))?;
                        self.usages.remove(&u.id);
                        self.stats.usages_deleted += 1;
                    }
                    session.commit()?;
                }
                Ordering::Equal => {
                    debug!("Keep {} with the same priority as primary {}", u, primary_acc);
                }
                Ordering::Less => {
                    let mut session = ctx.store.session()?;
                    session.add_issue(&ctx.key(&u.id), Issue::HomotypicConsolidationUnresolved)?;
                    session.commit()?;
                    warn!("{} is more trusted than the primary usage {}", u, primary_acc);
                    unresolved = true;
                }
            }
        }
        if unresolved {
            self.stats.unresolved_groups += 1;
        }
        Ok(())
    }

    /// Turn a usage into a synonym of an accepted target, moving all its descendants along.
    ///
    /// Returns false and changes nothing if the conversion is not allowed.
    pub fn convert_to_synonym(
        &mut self,
        session: &mut (dyn StoreSession + '_),
        usage: &LinneanNameUsage,
        target: &LinneanNameUsage,
        issue: Option<Issue>,
    ) -> ChecklistResult<bool> {
        if !target.is_taxon() {
            warn!("Cannot convert {} into a synonym of the non accepted {}", usage, target);
            return Ok(false);
        }
        if usage.id == target.id {
            warn!("Refuse to convert {} into a synonym of itself", usage);
            return Ok(false);
        }
        if usage.is_synonym() && usage.parent_id.as_deref() == Some(target.id.as_str()) {
            warn!("{} already is a synonym of {}", usage, target);
            return Ok(false);
        }
        if usage.rank.is_genus_or_suprageneric() || target.rank.is_genus_or_suprageneric() {
            warn!(
                "Refuse to convert {} into a synonym of {}, rank {:?} is too high",
                usage, target, usage.rank.min(target.rank)
            );
            return Ok(false);
        }
        if usage.is_synonym() {
            info!("Move synonym {} to {}", usage, target);
        } else {
            info!("Convert {} into a synonym of {}", usage, target);
        }

        let ctx = self.ctx;
        let key = ctx.key(&usage.id);
        if let Some(issue) = issue {
            session.add_issue(&key, issue)?;
        }

        let traversal = TreeTraversal::new(ctx.dataset_key, usage.id.clone()).with_synonyms(true);
        let descendants: Vec<LinneanNameUsage> = session
            .process_tree(&traversal)?
            .collect::<ChecklistResult<Vec<_>>>()?;
        for d in descendants {
            if d.id == usage.id || d.parent_id.as_deref() == Some(target.id.as_str()) {
                continue;
            }
            if d.id == target.id {
                warn!("Target {} is a descendant of {}, keep it in place", target, usage);
                continue;
            }
            debug!("Also move descendant {} to {}", d, target);
            session.update_parent(&ctx.key(&d.id), &target.id, ctx.config.user_key)?;
            if let Some(m) = self.usages.get_mut(&d.id) {
                m.parent_id = Some(target.id.clone());
            }
        }

        session.update_parent_and_status(&key, &target.id, TaxonomicStatus::Synonym, ctx.config.user_key)?;
        if let Some(m) = self.usages.get_mut(&usage.id) {
            m.parent_id = Some(target.id.clone());
            m.status = Some(TaxonomicStatus::Synonym);
        }
        self.stats.synonyms_converted += 1;
        Ok(true)
    }
}

fn is_species_of(species: &LinneanNameUsage, autonym: &LinneanNameUsage) -> bool {
    species.id != autonym.id
        && species.rank == Rank::Species
        && species.genus == autonym.genus
        && species.specific_epithet == autonym.specific_epithet
}

/// A new synonym duplicating the accepted name or one of its other synonyms
fn is_redundant(
    session: &(dyn StoreSession + '_),
    synonym: &LinneanNameUsage,
    accepted: &LinneanNameUsage,
    accepted_key: UsageKey,
) -> ChecklistResult<bool> {
    let label = synonym.label();
    if label.eq_ignore_ascii_case(&accepted.label()) {
        return Ok(true);
    }
    Ok(session
        .list_synonyms(&accepted_key)?
        .iter()
        .any(|s| s.id != synonym.id && s.label().eq_ignore_ascii_case(&label)))
}
