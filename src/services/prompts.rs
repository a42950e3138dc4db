//! 提示词模板
//!
//! 模板内容对流程来说是不透明配置，占位符写作 `{name}`，由 [`render`] 填充。

pub const CLASSIFY: &str = "You are a math domain classifier. Given the following problem statement: {topic}, \
classify it into one of the following domains: algebra, geometry, calculus, trigonometry, probability, statistics. \
Respond with only the domain name.";

pub const SOLVE: &str = "You are a {domain} problem solver. Solve the following {domain} problem: {topic}. \
Provide a step-by-step solution.";

pub const STORY: &str = r#"You are an expert story generator for math animations.
Take the math solution provided and create a creative story outline that can be visualized with smooth motion,
a cinematic camera, realistic shading and a coherent environment.

Output BOTH:
1. A short narrative paragraph (compact, vivid, student-friendly).
2. A JSON object with keys:
   - characters: list of {"name", "type", "traits", "role"}
   - setting: {"location", "time", "mood", "environment"}
   - key_visuals: list of strings
   - camera_style: {"shots": list, "motion": list}
   - quality_cues: {"lighting", "materials", "motion_style", "environment_scale"}

Solution:
{solution}"#;

pub const SCRIPT: &str = r#"You generate Blender Python scripts for math animations.

Rules:
- Do NOT use bpy.ops.* or selection-dependent patterns (active_object, selected_objects).
- Create datablocks explicitly via bpy.data.*.new() and link them with scene.collection.objects.link(obj).
- Check for existing datablocks by name before creating; reuse or remove them with do_unlink.
- Keyframe only animatable properties (location, rotation_euler, scale, light energy, camera lens).
- Set the render engine and frame range explicitly.
- Encapsulate the logic in main() and call it under if __name__ == "__main__".
- Output ONLY a single Python script inside one code block.

Solution:
{solution}

Animation story:
{animation_story}"#;

/// 用 `vars` 填充模板中的 `{name}` 占位符，未知占位符原样保留
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = template.to_string();
    for (name, value) in vars {
        out = out.replace(&format!("{{{}}}", name), value);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_replaces_every_occurrence() {
        let prompt = render(SOLVE, &[("domain", "geometry"), ("topic", "Area of circle r=3")]);
        assert!(prompt.starts_with("You are a geometry problem solver."));
        assert!(prompt.contains("geometry problem: Area of circle r=3."));
        assert!(!prompt.contains("{domain}"));
    }

    #[test]
    fn test_render_keeps_unknown_placeholders() {
        assert_eq!(render("{a} {b}", &[("a", "1")]), "1 {b}");
    }

    #[test]
    fn test_story_schema_braces_survive() {
        let prompt = render(STORY, &[("solution", "x = 2")]);
        assert!(prompt.contains(r#"{"shots": list, "motion": list}"#));
        assert!(prompt.ends_with("x = 2"));
    }
}
