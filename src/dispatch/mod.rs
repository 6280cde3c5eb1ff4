//! The per-prompt loop: directives, binding writes and submission.

mod submit;

pub use submit::*;

use crate::binding::{BindingKind, BindingSet};
use crate::config::PromptOptions;
use crate::directive::{DirectiveOverrides, PromptDecorator};
use crate::error::SubmitError;
use crate::graph::{WorkflowGraph, coerce_value};
use crate::placeholder::{RenderContext, ValueSnapshot, generate_seed, resolve_value};
use crate::prompt::{Entry, PromptStream};
use chrono::{Local, NaiveDateTime};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::Value;
use tracing::{debug, error, info, warn};

/// What a single prompt was turned into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedPrompt {
    /// The effective prompt text after prepend, append and truncation.
    pub text: String,
    /// The seed shared by all seed bindings for this prompt.
    pub seed: u64,
    /// Number of graph locations written.
    pub writes: usize,
}

/// Totals for a finished run.
#[derive(Debug, Clone, Default)]
pub struct DispatchSummary {
    pub prompts: usize,
    pub queued: usize,
    /// `(prompt index, error)` for each failed submission; indices start at 1.
    pub failures: Vec<(usize, SubmitError)>,
    pub directives_applied: usize,
    pub directives_rejected: usize,
}

/// Drives a prompt stream through the bindings and into a submitter.
///
/// The graph is mutated in place once per prompt; every write of an iteration
/// is computed from the argument values as they stood before that iteration's
/// first write.
pub struct Dispatcher<S: Submitter, R: Rng = StdRng> {
    bindings: BindingSet,
    overrides: DirectiveOverrides,
    decorator: PromptDecorator,
    submitter: S,
    rng: R,
    clock: Box<dyn Fn() -> NaiveDateTime>,
}

impl<S: Submitter> Dispatcher<S, StdRng> {
    pub fn new(bindings: BindingSet, submitter: S) -> Self {
        Self {
            bindings,
            overrides: DirectiveOverrides::new(),
            decorator: PromptDecorator::default(),
            submitter,
            rng: StdRng::from_os_rng(),
            clock: Box::new(|| Local::now().naive_local()),
        }
    }
}

impl<S: Submitter, R: Rng> Dispatcher<S, R> {
    /// Replaces the seed source.
    pub fn with_rng<R2: Rng>(self, rng: R2) -> Dispatcher<S, R2> {
        Dispatcher {
            bindings: self.bindings,
            overrides: self.overrides,
            decorator: self.decorator,
            submitter: self.submitter,
            rng,
            clock: self.clock,
        }
    }

    pub fn with_prompt_options(mut self, options: PromptOptions) -> Self {
        self.decorator = PromptDecorator::new(options);
        self
    }

    /// Replaces the time source used for `<date>` and `<time>`.
    pub fn with_clock(mut self, clock: impl Fn() -> NaiveDateTime + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn bindings(&self) -> &BindingSet {
        &self.bindings
    }

    pub fn overrides(&self) -> &DirectiveOverrides {
        &self.overrides
    }

    pub fn submitter(&self) -> &S {
        &self.submitter
    }

    pub fn into_submitter(self) -> S {
        self.submitter
    }

    /// Consumes the stream, submitting one graph per prompt entry.
    ///
    /// Directives update the override table and are not counted as prompts.
    /// A failed submission is logged and the loop moves on.
    pub fn run(&mut self, graph: &mut WorkflowGraph, stream: PromptStream) -> DispatchSummary {
        let total = stream.prompts_remaining();
        info!("Found {} prompt(s) to queue", total);

        let mut summary = DispatchSummary::default();
        for entry in stream {
            match entry {
                Entry::Directive(directive) => {
                    match self.overrides.apply(&directive, &self.bindings) {
                        Ok(()) => {
                            summary.directives_applied += 1;
                            info!("Applied directive {}", directive);
                        }
                        Err(rejection) => {
                            summary.directives_rejected += 1;
                            warn!("Ignoring directive {}: {}", directive, rejection);
                        }
                    }
                }
                Entry::Prompt(raw) => {
                    summary.prompts += 1;
                    let index = summary.prompts;
                    let prepared = self.prepare(graph, &raw);

                    match self.submitter.submit(graph) {
                        Ok(()) => {
                            summary.queued += 1;
                            info!(
                                seed = prepared.seed,
                                "Queued prompt #{} of {}: {}", index, total, prepared.text
                            );
                        }
                        Err(e) => {
                            error!("Error sending prompt #{}: {}", index, e);
                            summary.failures.push((index, e));
                        }
                    }
                }
            }
        }

        info!(
            queued = summary.queued,
            failed = summary.failures.len(),
            "Finished {} prompt(s)",
            summary.prompts
        );
        summary
    }

    /// Writes every resolved binding for one raw prompt line into `graph`.
    pub fn prepare(&mut self, graph: &mut WorkflowGraph, raw_prompt: &str) -> PreparedPrompt {
        let text = self.decorator.decorate(raw_prompt);
        let seed = generate_seed(&mut self.rng);
        let now = (self.clock)();
        let writes = self.write_bindings(graph, &text, seed, now);
        PreparedPrompt { text, seed, writes }
    }

    fn write_bindings(
        &self,
        graph: &mut WorkflowGraph,
        prompt: &str,
        seed: u64,
        now: NaiveDateTime,
    ) -> usize {
        let snapshot = ValueSnapshot::capture(&self.bindings, &self.overrides);
        let ctx = RenderContext {
            prompt,
            seed,
            now,
            values: &snapshot,
        };

        let mut writes = 0;
        for binding in self.bindings.resolved() {
            let Some(location) = binding.location() else {
                continue;
            };
            let raw = if binding.kind == BindingKind::Prompt {
                prompt
            } else {
                match self
                    .overrides
                    .get(&binding.name)
                    .or(binding.default_value.as_deref())
                {
                    Some(value) => value,
                    None => continue,
                }
            };

            let resolved = resolve_value(binding.kind, raw, &ctx);
            let value = match binding.kind {
                BindingKind::Prompt => Value::String(resolved),
                _ => coerce_value(&resolved, binding.template_value.as_ref()),
            };

            debug!("Setting {} = {}", location, value);
            if graph.set_nested_value(location, value) {
                writes += 1;
            } else {
                warn!("Could not write '{}' at {}", binding.name, location);
            }
        }
        writes
    }
}
