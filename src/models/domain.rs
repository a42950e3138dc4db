/// 数学领域（分类器输出的封闭集合）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MathDomain {
    /// 代数
    Algebra,
    /// 几何
    Geometry,
    /// 微积分
    Calculus,
    /// 三角
    Trigonometry,
    /// 概率
    Probability,
    /// 统计
    Statistics,
}

static LABELS: phf::Map<&'static str, MathDomain> = phf::phf_map! {
    "algebra" => MathDomain::Algebra,
    "geometry" => MathDomain::Geometry,
    "calculus" => MathDomain::Calculus,
    "trigonometry" => MathDomain::Trigonometry,
    "probability" => MathDomain::Probability,
    "statistics" => MathDomain::Statistics,
};

impl MathDomain {
    pub const ALL: [MathDomain; 6] = [
        MathDomain::Algebra,
        MathDomain::Geometry,
        MathDomain::Calculus,
        MathDomain::Trigonometry,
        MathDomain::Probability,
        MathDomain::Statistics,
    ];

    /// 标签文本
    pub fn as_str(self) -> &'static str {
        match self {
            MathDomain::Algebra => "algebra",
            MathDomain::Geometry => "geometry",
            MathDomain::Calculus => "calculus",
            MathDomain::Trigonometry => "trigonometry",
            MathDomain::Probability => "probability",
            MathDomain::Statistics => "statistics",
        }
    }

    /// 解析分类器返回的标签
    ///
    /// 标签集合是封闭的，但这里不要求逐字节相等：模型经常在标签后带换行、
    /// 句点或首字母大写（`" Geometry.\n"`），这些都视为同一个标签。
    /// 除此之外的任何文本（多余单词、近义词、空串）一律返回 `None`。
    /// 会话里保存的始终是原始标签，这里的放宽只影响路由。
    pub fn parse(label: &str) -> Option<Self> {
        let cleaned = label.trim().trim_end_matches('.').trim();
        if cleaned.is_empty() {
            return None;
        }
        LABELS.get(cleaned.to_ascii_lowercase().as_str()).copied()
    }
}

impl std::fmt::Display for MathDomain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
