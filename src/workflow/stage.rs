//! 阶段定义
//!
//! 每个阶段声明自己读哪些字段、写哪一个字段。[`StageScope`] 按声明放行，
//! 越界读取直接报错，写入只能落到本阶段的目标字段上。

use std::fmt::Display;

use crate::error::WorkflowError;
use crate::models::{Session, SessionField};

/// 流程阶段（固定线性顺序）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Classify,
    Solve,
    Narrate,
    RenderScript,
}

impl Stage {
    pub const ORDER: [Stage; 4] = [
        Stage::Classify,
        Stage::Solve,
        Stage::Narrate,
        Stage::RenderScript,
    ];

    pub fn reads(self) -> &'static [SessionField] {
        match self {
            Stage::Classify => &[SessionField::Topic],
            Stage::Solve => &[SessionField::Topic, SessionField::MathDomain],
            Stage::Narrate => &[SessionField::Solution],
            Stage::RenderScript => &[SessionField::Solution, SessionField::AnimationStory],
        }
    }

    pub fn writes(self) -> SessionField {
        match self {
            Stage::Classify => SessionField::MathDomain,
            Stage::Solve => SessionField::Solution,
            Stage::Narrate => SessionField::AnimationStory,
            Stage::RenderScript => SessionField::BlenderCode,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Classify => "classify",
            Stage::Solve => "solve",
            Stage::Narrate => "narrate",
            Stage::RenderScript => "render_script",
        }
    }
}

impl Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 单个阶段对会话的受限视图
///
/// `opened` 是阶段开始时读到的快照，提交时用它判断期间是否有别的写入。
#[derive(Debug)]
pub struct StageScope {
    stage: Stage,
    opened: Session,
    session: Session,
    journal: Vec<SessionField>,
}

impl StageScope {
    pub fn new(stage: Stage, session: Session) -> Self {
        Self {
            stage,
            opened: session.clone(),
            session,
            journal: Vec::new(),
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// 读取已声明的字段
    pub fn read(&self, field: SessionField) -> Result<Option<&str>, WorkflowError> {
        if !self.stage.reads().contains(&field) {
            return Err(WorkflowError::UndeclaredAccess {
                stage: self.stage,
                field,
            });
        }
        Ok(self.session.get(field))
    }

    /// 写入本阶段的目标字段，每次写入都记入日志（值不变也记）
    pub fn write(&mut self, value: impl Into<String>) {
        let target = self.stage.writes();
        self.session.set(target, value);
        self.journal.push(target);
    }

    /// 按顺序记录的写入
    pub fn journal(&self) -> &[SessionField] {
        &self.journal
    }

    pub fn opened(&self) -> &Session {
        &self.opened
    }

    pub fn into_session(self) -> Session {
        self.session
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_each_stage_writes_a_distinct_field() {
        let targets: std::collections::HashSet<SessionField> =
            Stage::ORDER.iter().map(|s| s.writes()).collect();
        assert_eq!(targets.len(), Stage::ORDER.len());
        assert!(!targets.contains(&SessionField::Topic));
    }

    #[test]
    fn test_stages_only_read_earlier_outputs() {
        for (i, stage) in Stage::ORDER.iter().enumerate() {
            let earlier: Vec<SessionField> =
                Stage::ORDER[..i].iter().map(|s| s.writes()).collect();
            for field in stage.reads() {
                assert!(
                    *field == SessionField::Topic || earlier.contains(field),
                    "{stage} reads {field} before it is produced"
                );
            }
        }
    }

    #[test]
    fn test_scope_rejects_undeclared_read() {
        let scope = StageScope::new(Stage::Narrate, Session::with_topic("t"));
        let err = scope.read(SessionField::Topic).unwrap_err();
        assert!(matches!(
            err,
            WorkflowError::UndeclaredAccess {
                stage: Stage::Narrate,
                field: SessionField::Topic
            }
        ));
    }

    #[test]
    fn test_scope_writes_only_target() {
        let mut scope = StageScope::new(Stage::Solve, Session::with_topic("t"));
        assert_eq!(scope.read(SessionField::Topic).unwrap(), Some("t"));
        assert!(scope.journal().is_empty());

        scope.write("x = 2");
        assert_eq!(scope.journal(), &[SessionField::Solution]);

        let after = scope.into_session();
        assert_eq!(
            after.changed_fields(&Session::with_topic("t")),
            vec![SessionField::Solution]
        );
    }

    #[test]
    fn test_journal_keeps_writes_of_unchanged_value() {
        let mut opened = Session::with_topic("t");
        opened.set(SessionField::MathDomain, "algebra");

        let mut scope = StageScope::new(Stage::Classify, opened.clone());
        scope.write("algebra");

        assert_eq!(scope.journal(), &[SessionField::MathDomain]);
        assert_eq!(scope.opened(), &opened);
        assert!(scope.into_session().changed_fields(&opened).is_empty());
    }
}
