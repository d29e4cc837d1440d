use crate::validity::FieldId;

/// A boolean source feeding the submit gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GateInput {
    /// Selection length equals the number of bookings.
    DateCount,
    Field(FieldId),
}

/// Folds every input into one submit-enable value.
///
/// Each input remembers its latest emission and is `None` until it has
/// emitted once; `None` counts as `false`. The combined value starts closed
/// and is only reported when it changes.
#[derive(Debug, Clone)]
pub struct SubmitGate {
    inputs: Vec<(GateInput, Option<bool>)>,
    open: bool,
}

impl SubmitGate {
    pub fn new<I>(inputs: I) -> Self
    where
        I: IntoIterator<Item = GateInput>,
    {
        let mut slots: Vec<(GateInput, Option<bool>)> = Vec::new();
        for input in inputs {
            if !slots.iter().any(|(existing, _)| *existing == input) {
                slots.push((input, None));
            }
        }
        Self {
            inputs: slots,
            open: false,
        }
    }

    /// Gate over the date count plus one input per field
    pub fn for_fields<I>(fields: I) -> Self
    where
        I: IntoIterator<Item = FieldId>,
    {
        let fields = fields.into_iter().map(GateInput::Field);
        Self::new(std::iter::once(GateInput::DateCount).chain(fields))
    }

    /// Record an emission and recombine. Returns the combined value if it
    /// changed.
    pub fn update(&mut self, input: GateInput, value: bool) -> Option<bool> {
        let Some(slot) = self.inputs.iter_mut().find(|(existing, _)| *existing == input) else {
            tracing::warn!(?input, "Ignoring emission from an input the gate does not combine");
            return None;
        };
        slot.1 = Some(value);

        let combined = self.inputs.iter().all(|(_, latest)| latest.unwrap_or(false));
        if combined == self.open {
            return None;
        }
        self.open = combined;
        Some(combined)
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn latest(&self, input: GateInput) -> Option<bool> {
        self.inputs
            .iter()
            .find(|(existing, _)| *existing == input)
            .and_then(|(_, latest)| *latest)
    }

    /// Inputs that have not emitted yet
    pub fn pending(&self) -> Vec<GateInput> {
        self.inputs
            .iter()
            .filter(|(_, latest)| latest.is_none())
            .map(|(input, _)| *input)
            .collect()
    }
}
