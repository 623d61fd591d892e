//! Splitting each emitter of a VFX system into its own wrapper system,
//! triggered from the original system through a child particle link.

use std::path::Path;
use std::sync::LazyLock;

use propbin_hash::NameResolver;
use propbin_model::{Container, Entry, Field, FieldSet, Key, Kind, Struct, Value};
use regex_lite::Regex;
use tracing::{debug, info, warn};

use crate::schema::{TypeMatcher, VFX_SYSTEM, fields, structs};
use crate::{OpsContext, OpsResult};

static SHORT_PREFIX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z]+_(Base_|Skin\d+_)").expect("Invalid short name regex")
});

const SHORT_NAME_MAX: usize = 25;

/// Compact system name used inside trigger names.
///
/// Takes `particleName`, else `particlePath`, keeps the last `/` segment,
/// strips a leading `<Family>_Base_` or `<Family>_Skin<N>_` and truncates to
/// 25 characters. Without either field, the identity's first 8 hex digits.
pub fn short_name(entry: &Entry) -> String {
    let mut name = None;
    for field in &entry.fields {
        match (&field.value, field.name) {
            (Value::String(s), n) if n == fields::PARTICLE_NAME => {
                name = Some(s.as_str());
                break;
            }
            (Value::String(s), n) if n == fields::PARTICLE_PATH => name = Some(s.as_str()),
            _ => {}
        }
    }

    let Some(name) = name.filter(|n| !n.is_empty()) else {
        return entry.id().to_hex();
    };
    let last = name.rsplit('/').next().unwrap_or(name);
    SHORT_PREFIX_RE
        .replace(last, "")
        .chars()
        .take(SHORT_NAME_MAX)
        .collect()
}

fn value_float(v: f32) -> Value {
    Value::Embed(Struct::of_type(
        structs::VALUE_FLOAT,
        vec![Field::new(fields::CONSTANT_VALUE, Value::F32(v))],
    ))
}

/// Emitter that spawns the wrapper system named `trigger_name` as a child.
pub fn trigger_emitter(trigger_name: &str, emitter_name: &str, position: usize) -> Value {
    let identifier = Struct::of_type(
        structs::CHILD_IDENTIFIER,
        vec![Field::new(fields::EFFECT, Value::Link(Key::hashed(trigger_name)))],
    );
    let child_set = Struct::of_type(
        structs::CHILD_PARTICLE_SET,
        vec![Field::new(
            fields::CHILDREN_IDENTIFIERS,
            Value::list(Kind::Embed, vec![Value::Embed(identifier)]),
        )],
    );

    Value::pointer(Struct::of_type(
        structs::EMITTER,
        vec![
            Field::new(fields::IS_SINGLE_PARTICLE, Value::Flag(true)),
            Field::new(fields::CHILD_PARTICLE_SET, Value::pointer(child_set)),
            Field::new(fields::BIND_WEIGHT, value_float(1.0)),
            Field::new(fields::IS_LOCAL_ORIENTATION, Value::Flag(true)),
            Field::new(fields::RATE, value_float(1.0)),
            Field::new(
                fields::EMITTER_NAME,
                Value::string(format!("Trigger_{position}_{emitter_name}")),
            ),
        ],
    ))
}

/// Top-level system holding a single emitter, identified by `trigger_name`.
pub fn wrapper_system(trigger_name: &str, emitter: Value) -> Entry {
    Entry::new(Key::hashed(trigger_name), Key::hashed(VFX_SYSTEM))
        .with_field(Field::new(
            fields::COMPLEX_EMITTERS,
            Value::list(emitter.kind(), vec![emitter]),
        ))
        .with_field(Field::new(fields::PARTICLE_NAME, Value::string(trigger_name)))
        .with_field(Field::new(fields::PARTICLE_PATH, Value::string(trigger_name)))
}

/// Replaces each emitter of `entry` by a trigger and returns one wrapper
/// system per emitter, in emitter order. Entries without emitters yield
/// nothing and are left untouched.
pub fn wrap_entry(entry: &mut Entry) -> Vec<Entry> {
    let short = short_name(entry);
    let Some(list) = entry
        .field_mut(fields::COMPLEX_EMITTERS)
        .and_then(|f| f.value.items_mut())
    else {
        return Vec::new();
    };

    let mut wrappers = Vec::with_capacity(list.len());
    let mut triggers = Vec::with_capacity(list.len());
    for (i, emitter) in std::mem::take(list).into_iter().enumerate() {
        let position = i + 1;
        let emitter_name = emitter
            .as_struct()
            .and_then(|s| s.string(fields::EMITTER_NAME))
            .map_or_else(|| format!("Emitter_{position}"), str::to_string);
        let trigger_name = format!("REC_{short}_{emitter_name}");

        triggers.push(trigger_emitter(&trigger_name, &emitter_name, position));
        wrappers.push(wrapper_system(&trigger_name, emitter));
    }
    *list = triggers;
    wrappers
}

/// Counts from one wrap pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WrapReport {
    /// Systems whose emitters were replaced by triggers.
    pub systems: usize,
    pub emitters: usize,
}

/// Wraps every emitter of every matching entry. Wrapper systems are
/// appended after the existing entries.
pub fn wrap_container(
    container: &mut Container,
    matcher: &TypeMatcher,
    resolver: &NameResolver,
) -> WrapReport {
    let mut report = WrapReport::default();
    let mut added = Vec::new();

    for entry in &mut container.entries {
        if !matcher.matches(entry, resolver) {
            continue;
        }
        let wrappers = wrap_entry(entry);
        if wrappers.is_empty() {
            continue;
        }
        debug!(
            "Split {} emitters of {}",
            wrappers.len(),
            entry.identity.display(resolver)
        );
        report.systems += 1;
        report.emitters += wrappers.len();
        added.extend(wrappers);
    }
    container.entries.extend(added);

    let duplicates = container.duplicate_identities();
    if !duplicates.is_empty() {
        warn!(
            "{} trigger names collide: {}",
            duplicates.len(),
            duplicates.iter().map(|h| h.to_hex()).collect::<Vec<_>>().join(", ")
        );
    }
    report
}

/// Wraps the emitters of one container file in place.
pub struct Wrapper<'a> {
    ctx: OpsContext<'a>,
    matcher: TypeMatcher,
}

impl<'a> Wrapper<'a> {
    pub fn new(ctx: OpsContext<'a>) -> Self {
        Self {
            ctx,
            matcher: TypeMatcher::new(VFX_SYSTEM),
        }
    }

    pub fn run(&self, path: &Path) -> OpsResult<WrapReport> {
        let mut container = self.ctx.read(path)?;
        let report = wrap_container(&mut container, &self.matcher, self.ctx.resolver);

        if report.emitters == 0 {
            info!("No emitters to split in {}", path.display());
            return Ok(report);
        }

        self.ctx.write(&container, path)?;
        info!(
            "Split {} emitters from {} systems in {}",
            report.emitters,
            report.systems,
            path.display()
        );
        Ok(report)
    }
}
