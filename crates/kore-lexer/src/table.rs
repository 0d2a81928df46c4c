//! State tables: named, ordered rule lists with includes resolved.
//! 状态表：具名的有序规则列表，include 在构建时展开。

use crate::error::ConfigError;
use crate::rule::{Action, Pattern, Rule, RuleDef, Transition};
use kore_common::{Interner, Symbol};
use tracing::debug;

/// Index of a compiled rule inside its [`StateTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RuleId(u32);

impl RuleId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone)]
enum Entry {
    Rule(usize),
    Include(String),
}

/// The description of one state: rules and includes in priority order.
#[derive(Debug, Clone)]
pub struct StateDef {
    rules: Vec<RuleDef>,
    entries: Vec<Entry>,
}

impl Default for StateDef {
    fn default() -> Self {
        Self::new()
    }
}

impl StateDef {
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            entries: Vec::new(),
        }
    }

    /// Add a rule matching `pattern`. The pattern of a `Default` action is ignored.
    pub fn rule(&mut self, pattern: &str, action: Action) -> &mut RuleDef {
        self.push(RuleDef::new(pattern, action))
    }

    /// Add a zero-width rule that only changes the state stack.
    pub fn default(&mut self, transition: Transition) -> &mut RuleDef {
        self.push(RuleDef::default(transition))
    }

    /// Splice the rules of `state` in at this position.
    pub fn include(&mut self, state: impl Into<String>) -> &mut Self {
        self.entries.push(Entry::Include(state.into()));
        self
    }

    pub fn push(&mut self, rule: RuleDef) -> &mut RuleDef {
        let index = self.rules.len();
        self.rules.push(rule);
        self.entries.push(Entry::Rule(index));
        &mut self.rules[index]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Builder for a [`StateTable`].
///
/// States may be described in any order and may include states described
/// later. All references are checked by [`build`](Self::build).
#[derive(Debug, Clone)]
pub struct StateTableBuilder {
    root: String,
    states: Vec<(String, StateDef)>,
}

impl Default for StateTableBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl StateTableBuilder {
    /// A builder whose root state is named `root`.
    pub fn new() -> Self {
        Self {
            root: "root".to_owned(),
            states: Vec::new(),
        }
    }

    /// Rename the root state.
    pub fn root(&mut self, name: impl Into<String>) -> &mut Self {
        self.root = name.into();
        self
    }

    /// Describe a state.
    pub fn state(&mut self, name: impl Into<String>, f: impl FnOnce(&mut StateDef)) -> &mut Self {
        let mut def = StateDef::new();
        f(&mut def);
        self.states.push((name.into(), def));
        self
    }

    /// Add an already assembled state description.
    pub fn state_def(&mut self, name: impl Into<String>, def: StateDef) -> &mut Self {
        self.states.push((name.into(), def));
        self
    }

    /// Compile every pattern, resolve every state reference and flatten
    /// includes.
    #[tracing::instrument(level = "debug", skip_all, fields(root = %self.root, states = self.states.len()))]
    pub fn build(&self) -> Result<StateTable, ConfigError> {
        let mut names = Interner::new();
        for (name, _) in &self.states {
            let known = names.len();
            names.intern(name);
            if names.len() == known {
                return Err(ConfigError::DuplicateState(name.clone()));
            }
        }

        let root = names
            .lookup(&self.root)
            .ok_or_else(|| ConfigError::MissingRoot(self.root.clone()))?;

        let mut rules = Vec::new();
        let mut slots = Vec::with_capacity(self.states.len());
        for (name, def) in &self.states {
            let mut state_slots = Vec::with_capacity(def.entries.len());
            for (index, entry) in def.entries.iter().enumerate() {
                match entry {
                    Entry::Rule(i) => {
                        let rule = compile_rule(name, index, &def.rules[*i], &names)?;
                        state_slots.push(Slot::Rule(RuleId(rules.len() as u32)));
                        rules.push(rule);
                    }
                    Entry::Include(target) => {
                        let target = lookup(&names, name, target)?;
                        state_slots.push(Slot::Include(target));
                    }
                }
            }
            slots.push(state_slots);
        }

        let mut resolved = vec![None; slots.len()];
        let mut visiting = Vec::new();
        for (state, _) in names.iter() {
            flatten(state, &slots, &names, &mut resolved, &mut visiting)?;
        }
        let states: Vec<Vec<RuleId>> = resolved
            .into_iter()
            .map(Option::unwrap_or_default)
            .collect();

        for (state, name) in names.iter() {
            debug!(state = name, rules = states[state.index()].len(), "resolved state");
        }

        Ok(StateTable {
            names,
            rules,
            states,
            root,
        })
    }
}

#[derive(Debug, Clone, Copy)]
enum Slot {
    Rule(RuleId),
    Include(Symbol),
}

fn lookup(names: &Interner, state: &str, target: &str) -> Result<Symbol, ConfigError> {
    names.lookup(target).ok_or_else(|| ConfigError::UnknownState {
        state: state.to_owned(),
        target: target.to_owned(),
    })
}

fn compile_rule(
    state: &str,
    index: usize,
    def: &RuleDef,
    names: &Interner,
) -> Result<Rule, ConfigError> {
    let action = def.action.resolve(|target| lookup(names, state, target))?;

    let pattern = match &def.pattern {
        None => None,
        Some(source) => {
            let mut pattern =
                Pattern::new(source).map_err(|e| ConfigError::InvalidPattern {
                    state: state.to_owned(),
                    index,
                    pattern: source.clone(),
                    message: e.to_string(),
                })?;
            if let Some(chars) = &def.not_after {
                pattern = pattern.with_not_after(chars.clone());
            }
            if let Some(ch) = def.followed_by {
                pattern = pattern.with_followed_by(ch);
            }
            if let Some(kinds) = action.group_kinds() {
                if kinds.len() != pattern.group_count() {
                    return Err(ConfigError::GroupCountMismatch {
                        state: state.to_owned(),
                        index,
                        kinds: kinds.len(),
                        groups: pattern.group_count(),
                    });
                }
            }
            Some(pattern)
        }
    };

    Ok(Rule { pattern, action })
}

/// Depth-first include expansion with memoization; `visiting` holds the
/// current include chain so a repeated state is reported as a cycle.
fn flatten(
    state: Symbol,
    slots: &[Vec<Slot>],
    names: &Interner,
    resolved: &mut [Option<Vec<RuleId>>],
    visiting: &mut Vec<Symbol>,
) -> Result<(), ConfigError> {
    if resolved[state.index()].is_some() {
        return Ok(());
    }
    if let Some(start) = visiting.iter().position(|&s| s == state) {
        let path = visiting[start..]
            .iter()
            .chain(std::iter::once(&state))
            .map(|&s| names.get(s).to_owned())
            .collect();
        return Err(ConfigError::IncludeCycle { path });
    }

    visiting.push(state);
    let mut flat = Vec::new();
    for slot in &slots[state.index()] {
        match *slot {
            Slot::Rule(id) => flat.push(id),
            Slot::Include(target) => {
                flatten(target, slots, names, resolved, visiting)?;
                flat.extend_from_slice(resolved[target.index()].as_deref().unwrap_or_default());
            }
        }
    }
    visiting.pop();

    resolved[state.index()] = Some(flat);
    Ok(())
}

/// An immutable, validated rule table.
///
/// Each rule is stored once; a state that includes another holds the ids of
/// the included rules at the include position. Safe to share between
/// threads; every scan owns its own stack and cursor.
#[derive(Debug, Clone)]
pub struct StateTable {
    names: Interner,
    rules: Vec<Rule>,
    states: Vec<Vec<RuleId>>,
    root: Symbol,
}

impl StateTable {
    pub fn builder() -> StateTableBuilder {
        StateTableBuilder::new()
    }

    pub fn root(&self) -> Symbol {
        self.root
    }

    /// Look up a state by name.
    pub fn state(&self, name: &str) -> Option<Symbol> {
        self.names.lookup(name)
    }

    pub fn state_name(&self, state: Symbol) -> &str {
        self.names.get(state)
    }

    /// All states in the order they were described.
    pub fn states(&self) -> impl Iterator<Item = (Symbol, &str)> {
        self.names.iter()
    }

    /// The resolved rule order of a state.
    pub fn rule_ids(&self, state: Symbol) -> &[RuleId] {
        &self.states[state.index()]
    }

    pub fn rules(&self, state: Symbol) -> impl Iterator<Item = &Rule> {
        self.rule_ids(state).iter().map(|&id| self.rule(id))
    }

    pub fn rule(&self, id: RuleId) -> &Rule {
        &self.rules[id.index()]
    }

    /// Number of distinct compiled rules.
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }
}
