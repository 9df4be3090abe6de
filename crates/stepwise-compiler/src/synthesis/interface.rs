//! Interface synthesizer
//!
//! Turns flow sets into the ordered field lists of each step's `Input` and
//! `Output` records.
//!
//! - `Input(0)` lists the procedure parameters in order; defaulted
//!   parameters become optional fields.
//! - `Input(i)` for `i > 0` is `Output(i - 1)`.
//! - `Output(s)` keeps the input fields still live after `s`, in their
//!   existing order, then appends the variables `s` introduces into the
//!   outflow in first-use order.
//! - The terminal output carries only the procedure result, if any.

use std::collections::{BTreeSet, HashSet};
use stepwise_core::ast::{Procedure, ReturnType, VarId};
use stepwise_core::ir::{Field, FieldSource, FlowSet, Interface, OutputBinding};

/// Interface synthesizer
pub struct InterfaceSynthesizer;

impl InterfaceSynthesizer {
    /// Input of the first step: one field per parameter
    pub fn first_input(procedure: &Procedure) -> Interface {
        let mut names = FieldNames::default();
        let fields = procedure
            .parameters
            .iter()
            .map(|parameter| {
                let variable = procedure.variable(parameter.var);
                let name = names.claim(variable.name(), variable.order());
                match &parameter.default {
                    Some(default) => {
                        Field::optional(name, variable.ty().clone(), parameter.var, default.clone())
                    }
                    None => Field::required(name, variable.ty().clone(), parameter.var),
                }
            })
            .collect();

        Interface::new(fields)
    }

    /// Output of a step given its input and flow facts
    pub fn output(procedure: &Procedure, input: &Interface, flow: &FlowSet) -> Interface {
        let Some(outflow) = &flow.outflow else {
            return Self::terminal_output(procedure);
        };

        let mut names = FieldNames::default();
        let mut fields = Vec::new();

        for field in &input.fields {
            if let Some(var) = field.var.filter(|var| outflow.contains(var)) {
                names.reserve(&field.name);
                fields.push(Field::required(field.name.clone(), field.ty.clone(), var));
            }
        }

        let mut introduced: Vec<VarId> = outflow
            .iter()
            .copied()
            .filter(|var| !input.contains(*var))
            .collect();
        introduced.sort_by_key(|var| {
            (
                flow.region.first_use_position(*var).unwrap_or(usize::MAX),
                *var,
            )
        });

        // Later declarations yield the bare name to earlier ones
        let mut by_declaration = introduced.clone();
        by_declaration.sort();
        let assigned: Vec<(VarId, String)> = by_declaration
            .into_iter()
            .map(|var| {
                let variable = procedure.variable(var);
                (var, names.claim(variable.name(), variable.order()))
            })
            .collect();

        for var in introduced {
            let variable = procedure.variable(var);
            let name = assigned
                .iter()
                .find(|(candidate, _)| *candidate == var)
                .map(|(_, name)| name.clone())
                .unwrap_or_else(|| variable.name().to_string());
            fields.push(Field::required(name, variable.ty().clone(), var));
        }

        Interface::new(fields)
    }

    /// Output of the terminal step
    pub fn terminal_output(procedure: &Procedure) -> Interface {
        match &procedure.return_type {
            ReturnType::Void => Interface::empty(),
            ReturnType::Wrapped(ty) => Interface::new(vec![Field::result(ty.clone())]),
        }
    }

    /// Where each variable-carrying output field is read from.
    ///
    /// A field comes from the input argument when its variable is threaded
    /// through the step or passes through untouched; otherwise from the
    /// step local.
    pub fn bindings(
        input: &Interface,
        output: &Interface,
        flow: &FlowSet,
        threaded: &BTreeSet<VarId>,
    ) -> Vec<OutputBinding> {
        output
            .fields
            .iter()
            .filter_map(|field| {
                let var = field.var?;
                let from_input = input.contains(var)
                    && (threaded.contains(&var) || !flow.region.touches(var));
                Some(OutputBinding {
                    field: field.name.clone(),
                    var,
                    source: if from_input {
                        FieldSource::Input
                    } else {
                        FieldSource::Local
                    },
                })
            })
            .collect()
    }
}

/// Unique field names within one interface
#[derive(Default)]
struct FieldNames {
    taken: HashSet<String>,
}

impl FieldNames {
    fn reserve(&mut self, name: &str) {
        self.taken.insert(name.to_string());
    }

    /// Claim `name`, suffixing it with the declaration order on collision
    fn claim(&mut self, name: &str, order: usize) -> String {
        let mut candidate = name.to_string();
        while self.taken.contains(&candidate) {
            candidate = format!("{}_{}", candidate, order);
        }
        self.taken.insert(candidate.clone());
        candidate
    }
}
