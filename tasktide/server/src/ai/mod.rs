//! Heuristic "AI" endpoints: suggestions, analytics and ad-hoc prioritisation.
pub mod api;
