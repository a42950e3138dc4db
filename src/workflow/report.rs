//! 运行结果

use crate::error::WorkflowError;
use crate::models::{Session, SessionField, SessionKey};
use crate::workflow::Stage;

/// 一个阶段的提交记录
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageRecord {
    pub stage: Stage,
    /// 本阶段写入的字段（按写入顺序，值未变也算）
    pub written: Vec<SessionField>,
    /// 与阶段开始时的快照相比，存储里实际发生变化的字段
    pub changed: Vec<SessionField>,
}

/// 运行终态
#[derive(Debug)]
pub enum RunStatus {
    /// 所有阶段完成
    Complete,
    /// 中止；`stage` 为 `None` 表示在等待题目时就中止了
    Aborted {
        stage: Option<Stage>,
        error: WorkflowError,
    },
}

impl RunStatus {
    pub fn is_complete(&self) -> bool {
        matches!(self, RunStatus::Complete)
    }
}

/// 一次运行的报告
///
/// 中止时 `session` 保留已经写入的字段，作为诊断依据。
#[derive(Debug)]
pub struct RunReport {
    pub key: SessionKey,
    pub status: RunStatus,
    pub session: Session,
    /// 题目是否来自原始输入
    pub topic_from_input: bool,
    pub stages: Vec<StageRecord>,
}

impl RunReport {
    pub fn is_complete(&self) -> bool {
        self.status.is_complete()
    }

    /// 按提交顺序排列的写入字段
    pub fn writes(&self) -> Vec<SessionField> {
        let mut writes = Vec::new();
        if self.topic_from_input {
            writes.push(SessionField::Topic);
        }
        writes.extend(self.stages.iter().flat_map(|r| r.written.iter().copied()));
        writes
    }

    pub fn record(&self, stage: Stage) -> Option<&StageRecord> {
        self.stages.iter().find(|r| r.stage == stage)
    }

    /// 最终产物（渲染脚本）
    pub fn artifact(&self) -> Option<&str> {
        self.session.get(SessionField::BlenderCode)
    }

    pub fn abort_error(&self) -> Option<&WorkflowError> {
        match &self.status {
            RunStatus::Aborted { error, .. } => Some(error),
            RunStatus::Complete => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writes_flatten_in_order() {
        let report = RunReport {
            key: SessionKey::new("a", "u", "s"),
            status: RunStatus::Complete,
            session: Session::default(),
            topic_from_input: true,
            stages: vec![
                StageRecord {
                    stage: Stage::Classify,
                    written: vec![SessionField::MathDomain],
                    changed: vec![SessionField::MathDomain],
                },
                StageRecord {
                    stage: Stage::Solve,
                    written: vec![SessionField::Solution],
                    changed: Vec::new(),
                },
            ],
        };

        assert_eq!(
            report.writes(),
            vec![SessionField::Topic, SessionField::MathDomain, SessionField::Solution]
        );
        assert!(report.record(Stage::Narrate).is_none());
        assert!(report.abort_error().is_none());
    }
}
