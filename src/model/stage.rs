use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Git hook stage a registration can run in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Stage {
    #[serde(alias = "commit")]
    PreCommit,
    #[serde(alias = "merge-commit")]
    PreMergeCommit,
    #[serde(alias = "push")]
    PrePush,
    PrepareCommitMsg,
    CommitMsg,
    PostCheckout,
    PostCommit,
    PostMerge,
    PostRewrite,
    Manual,
}

impl Stage {
    pub const ALL: [Stage; 10] = [
        Stage::PreCommit,
        Stage::PreMergeCommit,
        Stage::PrePush,
        Stage::PrepareCommitMsg,
        Stage::CommitMsg,
        Stage::PostCheckout,
        Stage::PostCommit,
        Stage::PostMerge,
        Stage::PostRewrite,
        Stage::Manual,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Stage::PreCommit => "pre-commit",
            Stage::PreMergeCommit => "pre-merge-commit",
            Stage::PrePush => "pre-push",
            Stage::PrepareCommitMsg => "prepare-commit-msg",
            Stage::CommitMsg => "commit-msg",
            Stage::PostCheckout => "post-checkout",
            Stage::PostCommit => "post-commit",
            Stage::PostMerge => "post-merge",
            Stage::PostRewrite => "post-rewrite",
            Stage::Manual => "manual",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown stage `{0}`")]
pub struct UnknownStage(pub String);

impl FromStr for Stage {
    type Err = UnknownStage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Legacy names from older configurations
        let canonical = match s {
            "commit" => "pre-commit",
            "merge-commit" => "pre-merge-commit",
            "push" => "pre-push",
            other => other,
        };
        Stage::ALL
            .into_iter()
            .find(|stage| stage.as_str() == canonical)
            .ok_or_else(|| UnknownStage(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_canonical_and_legacy_names() {
        assert_eq!("pre-commit".parse::<Stage>().unwrap(), Stage::PreCommit);
        assert_eq!("commit".parse::<Stage>().unwrap(), Stage::PreCommit);
        assert_eq!("push".parse::<Stage>().unwrap(), Stage::PrePush);
        assert_eq!("manual".parse::<Stage>().unwrap(), Stage::Manual);
    }

    #[test]
    fn rejects_unknown_names() {
        let err = "pre-flight".parse::<Stage>().unwrap_err();
        assert_eq!(err.to_string(), "unknown stage `pre-flight`");
    }

    #[test]
    fn every_stage_round_trips_through_its_name() {
        for stage in Stage::ALL {
            assert_eq!(stage.as_str().parse::<Stage>().unwrap(), stage);
        }
    }

    #[test]
    fn deserializes_legacy_alias() {
        let stages: Vec<Stage> = serde_yml::from_str("[commit, pre-push]").unwrap();
        assert_eq!(stages, vec![Stage::PreCommit, Stage::PrePush]);
    }
}
