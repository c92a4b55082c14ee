use std::sync::Arc;

pub const MAX_PARAMS: usize = 20;
pub const MAX_TEXT_REF_STACK: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    Num(u64),
    Str(String),
}

impl Default for ParamValue {
    fn default() -> Self {
        ParamValue::Num(0)
    }
}

/// Decode parameters for one string, one value per slot.
///
/// Used both as the live parameter table of the text service and as the
/// frozen copy inside a snapshot. String slots own their text, so a clone
/// never shares storage with the table it came from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StringParams {
    slots: [ParamValue; MAX_PARAMS],
}

impl StringParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_num(&mut self, index: usize, value: u64) {
        self.slots[index] = ParamValue::Num(value);
    }

    pub fn set_str(&mut self, index: usize, value: impl Into<String>) {
        self.slots[index] = ParamValue::Str(value.into());
    }

    pub fn get(&self, index: usize) -> &ParamValue {
        &self.slots[index]
    }

    /// Numeric value of a slot; string slots read as `None`.
    pub fn num(&self, index: usize) -> Option<u64> {
        match &self.slots[index] {
            ParamValue::Num(value) => Some(*value),
            ParamValue::Str(_) => None,
        }
    }

    pub fn str(&self, index: usize) -> Option<&str> {
        match &self.slots[index] {
            ParamValue::Num(_) => None,
            ParamValue::Str(value) => Some(value.as_str()),
        }
    }

    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            *slot = ParamValue::default();
        }
    }

    /// Copies the first `count` slots of `source`, leaving the rest untouched.
    pub fn copy_prefix_from(&mut self, source: &StringParams, count: usize) {
        let count = count.min(MAX_PARAMS);
        self.slots[..count].clone_from_slice(&source.slots[..count]);
    }

    pub fn iter(&self) -> impl Iterator<Item = &ParamValue> {
        self.slots.iter()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentSource {
    pub grf_id: u32,
    pub name: String,
}

/// Extra parameters supplied by game content, injected only while a string
/// is being decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRefStack {
    source: Arc<ContentSource>,
    values: Vec<u32>,
}

impl TextRefStack {
    pub fn new(source: Arc<ContentSource>, values: &[u32]) -> Self {
        assert!(
            values.len() <= MAX_TEXT_REF_STACK,
            "text ref stack holds at most {MAX_TEXT_REF_STACK} values, got {}",
            values.len()
        );
        Self {
            source,
            values: values.to_vec(),
        }
    }

    /// Builds a stack from loose parts. No values means no stack; values
    /// without a source are a caller bug.
    pub fn from_parts(source: Option<Arc<ContentSource>>, values: &[u32]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let source = source.unwrap_or_else(|| {
            panic!(
                "text ref stack of {} values has no content source",
                values.len()
            )
        });
        Some(Self::new(source, values))
    }

    pub fn source(&self) -> &Arc<ContentSource> {
        &self.source
    }

    pub fn values(&self) -> &[u32] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source() -> Arc<ContentSource> {
        Arc::new(ContentSource {
            grf_id: 0x4D47_0101,
            name: "industries".to_string(),
        })
    }

    #[test]
    fn fresh_params_are_numeric_zero() {
        let params = StringParams::new();
        assert!(params.iter().all(|slot| *slot == ParamValue::Num(0)));
    }

    #[test]
    fn clone_owns_its_strings() {
        let mut original = StringParams::new();
        original.set_str(3, "Little Wickham");
        let copy = original.clone();
        original.set_str(3, "Overwritten");
        drop(original);

        assert_eq!(copy.str(3), Some("Little Wickham"));
    }

    #[test]
    fn num_and_str_accessors_respect_slot_kind() {
        let mut params = StringParams::new();
        params.set_num(0, 42);
        params.set_str(1, "abc");

        assert_eq!(params.num(0), Some(42));
        assert_eq!(params.str(0), None);
        assert_eq!(params.num(1), None);
        assert_eq!(params.str(1), Some("abc"));
    }

    #[test]
    fn copy_prefix_only_touches_requested_slots() {
        let mut live = StringParams::new();
        live.set_num(0, 1);
        live.set_num(1, 2);
        live.set_num(2, 3);

        let mut captured = StringParams::new();
        captured.copy_prefix_from(&live, 2);

        assert_eq!(captured.num(0), Some(1));
        assert_eq!(captured.num(1), Some(2));
        assert_eq!(captured.num(2), Some(0));
    }

    #[test]
    fn copy_prefix_caps_at_slot_count() {
        let mut live = StringParams::new();
        live.set_num(MAX_PARAMS - 1, 9);
        let mut captured = StringParams::new();
        captured.copy_prefix_from(&live, MAX_PARAMS + 10);
        assert_eq!(captured.num(MAX_PARAMS - 1), Some(9));
    }

    #[test]
    fn clear_resets_string_slots() {
        let mut params = StringParams::new();
        params.set_str(5, "owned");
        params.clear();
        assert_eq!(params.get(5), &ParamValue::Num(0));
    }

    #[test]
    fn empty_values_mean_no_stack() {
        assert!(TextRefStack::from_parts(None, &[]).is_none());
        assert!(TextRefStack::from_parts(Some(source()), &[]).is_none());
    }

    #[test]
    fn stack_keeps_source_alive() {
        let provider = source();
        let stack = TextRefStack::from_parts(Some(Arc::clone(&provider)), &[7, 8]).expect("stack");
        drop(provider);
        assert_eq!(stack.source().name, "industries");
        assert_eq!(stack.values(), &[7, 8]);
        assert_eq!(stack.len(), 2);
    }

    #[test]
    #[should_panic(expected = "no content source")]
    fn values_without_source_panic() {
        let _ = TextRefStack::from_parts(None, &[1]);
    }

    #[test]
    #[should_panic(expected = "at most")]
    fn oversized_stack_panics() {
        let values = [0u32; MAX_TEXT_REF_STACK + 1];
        let _ = TextRefStack::new(source(), &values);
    }
}
