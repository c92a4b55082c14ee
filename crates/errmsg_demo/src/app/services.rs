use std::collections::{BTreeMap, HashMap};

use errmsg::{
    CompanyId, CompanyRegistry, ParamValue, StringId, StringParams, TextRefStack, TextService,
};
use tracing::debug;

use super::scenario::{CompanyDef, StringDef};

const GLYPH_WIDTH: i32 = 7;
const LINE_HEIGHT: i32 = 12;

/// Template string table: `{n}` is replaced by parameter slot `n`.
#[derive(Debug, Default)]
pub(crate) struct DemoText {
    templates: HashMap<StringId, StringDef>,
    live: StringParams,
    stacked: Option<StringParams>,
}

impl DemoText {
    pub(crate) fn new(strings: &BTreeMap<u32, StringDef>) -> Self {
        let mut templates: HashMap<StringId, StringDef> = strings
            .iter()
            .map(|(id, def)| (StringId(*id), def.clone()))
            .collect();
        templates
            .entry(StringId::EMPTY)
            .or_insert_with(|| template("", 0));
        templates
            .entry(StringId::CAPTION)
            .or_insert_with(|| template("Message", 0));
        templates
            .entry(StringId::CAPTION_OTHER_COMPANY)
            .or_insert_with(|| template("Message from company {2}", 3));
        templates
            .entry(StringId::ERROR_OWNED_BY)
            .or_insert_with(|| template("... owned by {0} {1} (company {2})", 3));
        Self {
            templates,
            live: StringParams::new(),
            stacked: None,
        }
    }

    pub(crate) fn live_mut(&mut self) -> &mut StringParams {
        &mut self.live
    }
}

fn template(text: &str, params: usize) -> StringDef {
    StringDef {
        text: text.to_string(),
        params,
    }
}

impl TextService for DemoText {
    fn param_count(&self, text: StringId) -> usize {
        self.templates.get(&text).map_or(0, |def| def.params)
    }

    fn live_params(&self) -> &StringParams {
        self.stacked.as_ref().unwrap_or(&self.live)
    }

    fn start_text_ref_stack(&mut self, stack: &TextRefStack) {
        debug!(
            grf_id = stack.source().grf_id,
            values = stack.len(),
            "text_ref_stack_started"
        );
        let mut stacked = self.live.clone();
        for (slot, value) in stack.values().iter().enumerate() {
            stacked.set_num(slot, u64::from(*value));
        }
        self.stacked = Some(stacked);
    }

    fn stop_text_ref_stack(&mut self) {
        self.stacked = None;
    }

    fn render(&self, text: StringId, params: &StringParams) -> String {
        let Some(def) = self.templates.get(&text) else {
            return format!("<string {}>", text.0);
        };
        let mut rendered = def.text.clone();
        for (slot, value) in params.iter().enumerate() {
            let placeholder = format!("{{{slot}}}");
            if !rendered.contains(&placeholder) {
                continue;
            }
            let value = match value {
                ParamValue::Num(num) => num.to_string(),
                ParamValue::Str(text) => text.clone(),
            };
            rendered = rendered.replace(&placeholder, &value);
        }
        rendered
    }

    fn measure_height(&self, text: StringId, params: &StringParams, width: i32) -> i32 {
        let chars = self.render(text, params).chars().count() as i32;
        let per_line = (width / GLYPH_WIDTH).max(1);
        let lines = ((chars + per_line - 1) / per_line).max(1);
        lines * LINE_HEIGHT
    }
}

#[derive(Debug, Default)]
pub(crate) struct CompanyBook {
    colours: HashMap<CompanyId, [u8; 4]>,
}

impl CompanyBook {
    pub(crate) fn new(companies: &[CompanyDef]) -> Self {
        Self {
            colours: companies
                .iter()
                .map(|def| (CompanyId(def.id), def.colour))
                .collect(),
        }
    }

    pub(crate) fn remove(&mut self, company: CompanyId) -> bool {
        self.colours.remove(&company).is_some()
    }
}

impl CompanyRegistry for CompanyBook {
    fn is_valid(&self, company: CompanyId) -> bool {
        self.colours.contains_key(&company)
    }

    fn colour(&self, company: CompanyId) -> Option<[u8; 4]> {
        self.colours.get(&company).copied()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use errmsg::ContentSource;

    use super::*;

    fn table() -> BTreeMap<u32, StringDef> {
        let mut strings = BTreeMap::new();
        strings.insert(100, template("Can't build {0} near {1}", 2));
        strings
    }

    #[test]
    fn render_fills_placeholders() {
        let mut text = DemoText::new(&table());
        text.live_mut().set_str(0, "station");
        text.live_mut().set_num(1, 12);

        let line = text.render(StringId(100), text.live_params());
        assert_eq!(line, "Can't build station near 12");
    }

    #[test]
    fn unknown_string_renders_marker() {
        let text = DemoText::new(&BTreeMap::new());
        assert_eq!(
            text.render(StringId(999), &StringParams::new()),
            "<string 999>"
        );
        assert_eq!(text.param_count(StringId(999)), 0);
    }

    #[test]
    fn built_in_strings_are_present() {
        let text = DemoText::new(&BTreeMap::new());
        assert_eq!(text.param_count(StringId::ERROR_OWNED_BY), 3);
        assert_eq!(text.render(StringId::EMPTY, &StringParams::new()), "");
    }

    #[test]
    fn text_ref_stack_overrides_leading_slots_while_active() {
        let mut text = DemoText::new(&table());
        text.live_mut().set_num(0, 1);
        let stack = TextRefStack::new(
            Arc::new(ContentSource {
                grf_id: 0x4142_4344,
                name: "demo".to_string(),
            }),
            &[42],
        );

        text.start_text_ref_stack(&stack);
        assert_eq!(text.live_params().num(0), Some(42));
        text.stop_text_ref_stack();
        assert_eq!(text.live_params().num(0), Some(1));
    }

    #[test]
    fn measure_wraps_long_text() {
        let mut strings = BTreeMap::new();
        strings.insert(5, template(&"x".repeat(70), 0));
        let text = DemoText::new(&strings);
        assert_eq!(
            text.measure_height(StringId(5), &StringParams::new(), 70),
            7 * LINE_HEIGHT
        );
    }

    #[test]
    fn company_book_tracks_removal() {
        let mut book = CompanyBook::new(&[CompanyDef {
            id: 1,
            colour: [9, 9, 9, 255],
        }]);
        assert!(book.is_valid(CompanyId(1)));
        assert_eq!(book.colour(CompanyId(1)), Some([9, 9, 9, 255]));
        assert!(book.remove(CompanyId(1)));
        assert!(!book.is_valid(CompanyId(1)));
        assert!(!book.remove(CompanyId(1)));
    }
}
