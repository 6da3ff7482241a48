#[derive(Clone, Debug)]
pub struct RowEntry {
    pub id: String,
    pub text: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RowOutcome {
    Built,
    SkippedMissingSlot,
}

#[derive(Clone, Debug)]
pub struct RowStatus {
    pub id: String,
    pub outcome: RowOutcome,
}
