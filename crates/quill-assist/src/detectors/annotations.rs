//! Nullness annotations: reading the effective nullness of a declaration and changing it.
//!
//! Every detector that adds a nullness annotation goes through [`set_nullness`], which never
//! inserts an annotation the enclosing default already implies; it removes the conflicting
//! explicit annotation instead.

use quill_config::NullnessConfig;
use quill_core::{text, TextRange, TextRangeExt};
use quill_syntax::ast::{simple_name, Annotation, MethodDecl, Modifiers, TypeRef, TypeRefKind};
use quill_syntax::Semantics;

use crate::rewrite::Rewrite;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Nullness {
    Nullable,
    NonNull,
    Unspecified,
}

/// Where a nullness annotation of a return type or parameter lives.
#[derive(Debug, Clone, Copy)]
pub(crate) struct AnnotationSite<'a> {
    pub modifiers: &'a Modifiers,
    pub ty: &'a TypeRef,
}

impl<'a> AnnotationSite<'a> {
    pub fn annotations(self) -> impl Iterator<Item = &'a Annotation> {
        self.modifiers.annotations.iter().chain(self.ty.annotations.iter())
    }
}

/// Configured annotation names, matched by simple name.
#[derive(Debug, Clone, Copy)]
pub(crate) struct NullnessNames<'c> {
    config: &'c NullnessConfig,
}

impl<'c> NullnessNames<'c> {
    pub fn new(config: &'c NullnessConfig) -> Self {
        Self { config }
    }

    pub fn nullable(&self) -> &'c str {
        simple_name(&self.config.nullable)
    }

    pub fn non_null(&self) -> &'c str {
        simple_name(&self.config.non_null)
    }

    pub fn name(&self, nullness: Nullness) -> Option<&'c str> {
        match nullness {
            Nullness::Nullable => Some(self.nullable()),
            Nullness::NonNull => Some(self.non_null()),
            Nullness::Unspecified => None,
        }
    }

    fn classify(&self, annotation: &Annotation) -> Option<Nullness> {
        let name = annotation.simple_name();
        if name == self.nullable() {
            Some(Nullness::Nullable)
        } else if name == self.non_null() {
            Some(Nullness::NonNull)
        } else {
            None
        }
    }

    /// The explicit nullness annotation at `site`, if any.
    pub fn explicit<'a>(&self, site: AnnotationSite<'a>) -> Option<(Nullness, &'a Annotation)> {
        site.annotations()
            .find_map(|a| self.classify(a).map(|n| (n, a)))
    }

    fn is_default_marker(&self, modifiers: &Modifiers) -> bool {
        modifiers
            .annotation(simple_name(&self.config.non_null_by_default))
            .is_some()
    }

    /// Whether unannotated types in `method` are non-null: the method itself, an enclosing
    /// type or the package carries the default annotation.
    pub fn non_null_by_default(&self, sema: &Semantics<'_>, method: &MethodDecl) -> bool {
        self.is_default_marker(&method.modifiers) || self.non_null_by_default_at(sema, method.range.start_offset())
    }

    /// The default at `offset` from enclosing types and the package.
    pub fn non_null_by_default_at(&self, sema: &Semantics<'_>, offset: usize) -> bool {
        if sema
            .enclosing_types(offset)
            .iter()
            .any(|t| self.is_default_marker(&t.modifiers))
        {
            return true;
        }
        let marker = simple_name(&self.config.non_null_by_default);
        sema.tree()
            .unit()
            .package
            .as_ref()
            .is_some_and(|p| p.annotations.iter().any(|a| a.simple_name() == marker))
    }

    /// Explicit annotation, else the default, else unspecified.
    pub fn effective(&self, site: AnnotationSite<'_>, non_null_by_default: bool) -> Nullness {
        match self.explicit(site) {
            Some((nullness, _)) => nullness,
            None if non_null_by_default => Nullness::NonNull,
            None => Nullness::Unspecified,
        }
    }

    /// Annotations below `ty` (type arguments included) that the default makes redundant.
    pub fn implied<'a>(&self, ty: &'a TypeRef, out: &mut Vec<&'a Annotation>) {
        out.extend(
            ty.annotations
                .iter()
                .filter(|a| self.classify(a) == Some(Nullness::NonNull)),
        );
        match &ty.kind {
            TypeRefKind::Named { args: Some(args), .. } => {
                for arg in &args.args {
                    self.implied(arg, out);
                }
            }
            TypeRefKind::Array { element, .. } => self.implied(element, out),
            TypeRefKind::Wildcard { bound: Some(bound) } => self.implied(&bound.ty, out),
            _ => {}
        }
    }
}

/// Range removing `annotation`: its whole line when it stands alone there, else the
/// annotation and the blanks after it.
pub(crate) fn annotation_removal(source: &str, annotation: &Annotation) -> TextRange {
    let range = annotation.range;
    if text::is_first_on_line(source, range.start_offset()) && text::is_last_on_line(source, range.end_offset()) {
        return TextRange::from_offsets(
            text::line_start(source, range.start_offset()),
            text::line_end_including_newline(source, range.end_offset()),
        );
    }
    let rest = &source[range.end_offset()..];
    let blanks = rest.len() - rest.trim_start_matches([' ', '\t']).len();
    TextRange::from_offsets(range.start_offset(), range.end_offset() + blanks)
}

/// Text of `range` with the given annotations (and the blanks after them) cut out.
pub(crate) fn text_without(source: &str, range: TextRange, annotations: &[&Annotation]) -> String {
    let mut cuts: Vec<TextRange> = annotations
        .iter()
        .filter(|a| range.contains_range(a.range))
        .map(|a| {
            let rest = &source[a.range.end_offset()..range.end_offset()];
            let blanks = rest.len() - rest.trim_start_matches([' ', '\t']).len();
            TextRange::from_offsets(a.range.start_offset(), a.range.end_offset() + blanks)
        })
        .collect();
    cuts.sort_by_key(|r| r.start_offset());
    let mut out = String::new();
    let mut pos = range.start_offset();
    for cut in cuts {
        if cut.start_offset() < pos {
            continue;
        }
        out.push_str(&source[pos..cut.start_offset()]);
        pos = cut.end_offset();
    }
    out.push_str(&source[pos..range.end_offset()]);
    out
}

/// Make `site` carry `want`. Returns `false` when there was nothing to change.
pub(crate) fn set_nullness(
    rewrite: &mut Rewrite<'_>,
    names: NullnessNames<'_>,
    site: AnnotationSite<'_>,
    want: Nullness,
    non_null_by_default: bool,
) -> bool {
    let Some(name) = names.name(want) else {
        return false;
    };
    let implied = want == Nullness::NonNull && non_null_by_default;
    match names.explicit(site) {
        Some((current, _)) if current == want => false,
        Some((_, annotation)) if implied => {
            let range = annotation_removal(rewrite.source(), annotation);
            rewrite.remove(range);
            true
        }
        Some((_, annotation)) => {
            rewrite.replace(annotation.range, format!("@{name}"));
            true
        }
        None if implied => false,
        None => {
            rewrite.insert_before(site.ty.range, format!("@{name} "));
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_syntax::ast::Member;
    use quill_syntax::parse;

    #[test]
    fn removal_takes_the_line_when_alone() {
        let source = "class A {\n    @Nullable\n    String m() { return null; }\n}";
        let tree = parse(source);
        let Member::Method(method) = &tree.unit().types[0].members[0] else {
            panic!("expected a method");
        };
        let annotation = &method.modifiers.annotations[0];
        let range = annotation_removal(source, annotation);
        assert_eq!(range.slice(source), "    @Nullable\n");
    }

    #[test]
    fn removal_inline_takes_following_blanks() {
        let source = "class A { @Nullable  String m() { return null; } }";
        let tree = parse(source);
        let Member::Method(method) = &tree.unit().types[0].members[0] else {
            panic!("expected a method");
        };
        let range = annotation_removal(source, &method.modifiers.annotations[0]);
        assert_eq!(range.slice(source), "@Nullable  ");
    }

    #[test]
    fn defaults_come_from_enclosing_types() {
        let source = "@NonNullByDefault class A { String m() { return \"\"; } }";
        let tree = parse(source);
        let sema = Semantics::new(&tree);
        let config = NullnessConfig::default();
        let names = NullnessNames::new(&config);
        let Member::Method(method) = &tree.unit().types[0].members[0] else {
            panic!("expected a method");
        };
        assert!(names.non_null_by_default(&sema, method));
        let site = AnnotationSite {
            modifiers: &method.modifiers,
            ty: method.return_type.as_ref().unwrap(),
        };
        assert_eq!(names.effective(site, true), Nullness::NonNull);
        assert_eq!(names.effective(site, false), Nullness::Unspecified);
    }
}
