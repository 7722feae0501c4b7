use crate::record::ExportRecord;
use ahash::AHashMap;

/// Records destined for one output file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExportGroup {
    /// Owning account in per-account mode; `None` for the combined file.
    pub owner: Option<String>,
    pub records: Vec<ExportRecord>,
}

impl ExportGroup {
    pub fn combined(records: Vec<ExportRecord>) -> Self {
        Self { owner: None, records }
    }

    pub fn for_owner(owner: impl Into<String>, records: Vec<ExportRecord>) -> Self {
        Self { owner: Some(owner.into()), records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Split the combined sequence into output groups.
/// With `separate`, one group per owner in first-seen order; otherwise a single combined group.
/// Record order inside each group is the input order.
pub fn partition(records: Vec<ExportRecord>, separate: bool) -> Vec<ExportGroup> {
    if !separate {
        return vec![ExportGroup::combined(records)];
    }

    let mut index: AHashMap<String, usize> = AHashMap::new();
    let mut groups: Vec<ExportGroup> = Vec::new();
    for record in records {
        let slot = match index.get(&record.owner_account_id) {
            Some(&i) => i,
            None => {
                index.insert(record.owner_account_id.clone(), groups.len());
                groups.push(ExportGroup::for_owner(record.owner_account_id.clone(), Vec::new()));
                groups.len() - 1
            }
        };
        groups[slot].records.push(record);
    }
    groups
}
