use super::ExpectationResult;

use serde::{Serialize, Serializer};


/// Named expectation results in the order they were first captured.
///
/// Capturing a name that already exists replaces its result in place,
/// so the latest result wins while the original position is kept.
#[derive(Clone, Debug, Default)]
pub struct ExpectationRecorder {
    records: Vec<(String, ExpectationResult)>,
}

impl ExpectationRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn capture(&mut self, name: &str, result: ExpectationResult) {
        match self.records.iter_mut().find(|(existing, _)| existing == name) {
            Some((_, slot)) => {
                tracing::debug!("Expectation '{name}' captured again, replacing the previous result");
                *slot = result;
            }
            None => self.records.push((name.to_string(), result)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&ExpectationResult> {
        self.records
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, result)| result)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ExpectationResult)> {
        self.records.iter().map(|(name, result)| (name.as_str(), result))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of captured results that did not succeed.
    pub fn failures(&self) -> usize {
        self.records.iter().filter(|(_, result)| !result.success).count()
    }
}


#[derive(Serialize)]
struct RecordRef<'a> {
    name: &'a str,
    #[serde(flatten)]
    result: &'a ExpectationResult,
}

impl Serialize for ExpectationRecorder {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter().map(|(name, result)| RecordRef { name, result }))
    }
}
