use muse_core::Message;

/// State an agent runs against for the duration of one turn.
///
/// The agent only reads history from it; everything else the context holds
/// is reached through tool callbacks, which receive it by `&mut`.
pub trait RunContext: Send {
    /// Prior conversation replayed ahead of the new input, oldest first.
    fn history(&self) -> Vec<Message> {
        Vec::new()
    }
}

/// Stateless agents run against the unit context.
impl RunContext for () {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_context_has_no_history() {
        assert!(().history().is_empty());
    }
}
