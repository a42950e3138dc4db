//! 动画故事大纲
//!
//! 故事阶段的输出对流程来说是不透明文本，这里只做尽力解析，供日志和诊断使用，
//! 解析失败不影响流程。

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// 角色
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Character {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub traits: Vec<String>,
    pub role: String,
}

/// 场景设定
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Setting {
    pub location: String,
    pub time: String,
    pub mood: String,
    pub environment: serde_json::Value,
}

/// 镜头风格
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraStyle {
    pub shots: Vec<String>,
    pub motion: Vec<String>,
}

/// 画质提示
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QualityCues {
    pub lighting: String,
    pub materials: Vec<String>,
    pub motion_style: Vec<String>,
    pub environment_scale: String,
}

/// 结构化场景描述
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneDescription {
    pub characters: Vec<Character>,
    pub setting: Setting,
    pub key_visuals: Vec<String>,
    pub camera_style: CameraStyle,
    pub quality_cues: QualityCues,
}

/// 故事大纲 = 叙述段落 + 可选的场景描述
#[derive(Debug, Clone, PartialEq)]
pub struct StoryOutline {
    pub narrative: String,
    pub scene: Option<SceneDescription>,
}

fn fenced_json() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?s)```(?:json)?\s*(\{.*?\})\s*```").expect("valid regex")
    })
}

impl StoryOutline {
    /// 从生成文本中拆出叙述和场景描述
    pub fn parse(text: &str) -> Self {
        let text = text.trim();

        // 优先取 ```json 代码块，其次取第一个 '{' 到最后一个 '}'
        let (json_span, json_str) = if let Some(caps) = fenced_json().captures(text) {
            let whole = caps.get(0).map(|m| m.range());
            (whole, caps.get(1).map(|m| m.as_str()))
        } else {
            match (text.find('{'), text.rfind('}')) {
                (Some(start), Some(end)) if start < end => {
                    (Some(start..end + 1), Some(&text[start..=end]))
                }
                _ => (None, None),
            }
        };

        let scene = json_str.and_then(|s| serde_json::from_str::<SceneDescription>(s).ok());

        let narrative_src = match (&scene, json_span) {
            (Some(_), Some(span)) => &text[..span.start],
            _ => text,
        };

        Self {
            narrative: clean_narrative(narrative_src),
            scene,
        }
    }
}

fn clean_narrative(raw: &str) -> String {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter(|line| !line.eq_ignore_ascii_case("schema:"))
        .map(|line| {
            line.strip_prefix("Story:")
                .map(str::trim)
                .unwrap_or(line)
                .trim_matches('"')
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_has_no_scene() {
        let outline = StoryOutline::parse("A ball rolls to x=2.");
        assert_eq!(outline.narrative, "A ball rolls to x=2.");
        assert!(outline.scene.is_none());
    }

    #[test]
    fn test_inline_schema() {
        let text = r#"Story: "Leo climbs a ladder against a wall."
Schema:
{
  "characters": [{"name":"Leo","type":"human","traits":["curious"],"role":"student"}],
  "setting":{"location":"construction site","time":"day","mood":"curious","environment":["ladder","wall"]},
  "key_visuals":["hypotenuse highlight"],
  "camera_style":{"shots":["wide shot"],"motion":["pan upward"]},
  "quality_cues":{"lighting":"sunny","materials":["metal"],"motion_style":["smooth pans"],"environment_scale":"human-scale"}
}"#;
        let outline = StoryOutline::parse(text);
        assert_eq!(outline.narrative, "Leo climbs a ladder against a wall.");

        let scene = outline.scene.unwrap();
        assert_eq!(scene.characters.len(), 1);
        assert_eq!(scene.characters[0].kind, "human");
        assert_eq!(scene.setting.location, "construction site");
        assert_eq!(scene.camera_style.motion, vec!["pan upward"]);
        assert_eq!(scene.quality_cues.environment_scale, "human-scale");
    }

    #[test]
    fn test_fenced_schema_with_missing_keys() {
        let text =
            "On a racetrack, cars speed up.\n\n```json\n{\"key_visuals\": [\"tangent line\"]}\n```\n";
        let outline = StoryOutline::parse(text);
        assert_eq!(outline.narrative, "On a racetrack, cars speed up.");
        let scene = outline.scene.unwrap();
        assert_eq!(scene.key_visuals, vec!["tangent line"]);
        assert!(scene.characters.is_empty());
    }

    #[test]
    fn test_malformed_schema_keeps_full_text() {
        let text = "A story {not json}";
        let outline = StoryOutline::parse(text);
        assert!(outline.scene.is_none());
        assert_eq!(outline.narrative, "A story {not json}");
    }
}
