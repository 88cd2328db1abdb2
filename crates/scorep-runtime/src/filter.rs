//! Source-file and region filtering.
//!
//! A filter file has two optional blocks, `SCOREP_FILE_NAMES` and
//! `SCOREP_REGION_NAMES`, each holding `INCLUDE`/`EXCLUDE` lines of
//! whitespace-separated glob patterns. A name *passes* a block if it is
//! explicitly `INCLUDE`d, or if the block has no `INCLUDE` patterns at all
//! and the name is not `EXCLUDE`d. A file is filtered out iff it fails the
//! file block. A region is filtered out iff its file is filtered out, or
//! neither its demangled nor its mangled name passes the region block.

use crate::error::{ErrorCode, ScorepError};
use crate::glob::glob_match;

const FILE_NAMES_BEGIN: &str = "SCOREP_FILE_NAMES_BEGIN";
const FILE_NAMES_END: &str = "SCOREP_FILE_NAMES_END";
const REGION_NAMES_BEGIN: &str = "SCOREP_REGION_NAMES_BEGIN";
const REGION_NAMES_END: &str = "SCOREP_REGION_NAMES_END";

#[derive(Debug, Default, Clone)]
struct PatternBlock {
    includes: Vec<String>,
    excludes: Vec<String>,
}

impl PatternBlock {
    fn passes(&self, name: &str) -> bool {
        if !self.includes.is_empty() {
            self.includes.iter().any(|p| glob_match(p, name))
        } else {
            !self.excludes.iter().any(|p| glob_match(p, name))
        }
    }
}

#[derive(Debug, Clone)]
pub struct Filter {
    enabled: bool,
    files: PatternBlock,
    regions: PatternBlock,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlockKind {
    FileNames,
    RegionNames,
}

impl Filter {
    /// The no-op filter used when `SCOREP_FILTERING_FILE` names no file:
    /// nothing is ever filtered.
    pub fn disabled() -> Self {
        Filter {
            enabled: false,
            files: PatternBlock::default(),
            regions: PatternBlock::default(),
        }
    }

    pub fn parse(text: &str) -> Result<Self, ScorepError> {
        let mut files = PatternBlock::default();
        let mut regions = PatternBlock::default();
        let mut block: Option<BlockKind> = None;

        for raw_line in text.lines() {
            let line = match raw_line.find('#') {
                Some(idx) => &raw_line[..idx],
                None => raw_line,
            }
            .trim();
            if line.is_empty() {
                continue;
            }

            let mut tokens = line.split_whitespace();
            let head = tokens.next().unwrap();

            match head {
                FILE_NAMES_BEGIN => {
                    if block.is_some() {
                        return Err(unexpected_token(head));
                    }
                    block = Some(BlockKind::FileNames);
                }
                REGION_NAMES_BEGIN => {
                    if block.is_some() {
                        return Err(unexpected_token(head));
                    }
                    block = Some(BlockKind::RegionNames);
                }
                FILE_NAMES_END => {
                    if block != Some(BlockKind::FileNames) {
                        return Err(unexpected_token(head));
                    }
                    block = None;
                }
                REGION_NAMES_END => {
                    if block != Some(BlockKind::RegionNames) {
                        return Err(unexpected_token(head));
                    }
                    block = None;
                }
                "INCLUDE" | "EXCLUDE" => {
                    let Some(kind) = block else {
                        return Err(unexpected_token(head));
                    };
                    let target = match kind {
                        BlockKind::FileNames => &mut files,
                        BlockKind::RegionNames => &mut regions,
                    };
                    let patterns = target_list(target, head);
                    for pattern in tokens {
                        patterns.push(pattern.to_string());
                    }
                }
                other => return Err(unexpected_token(other)),
            }
        }

        if block.is_some() {
            return Err(ScorepError {
                code: ErrorCode::ParseNoSeparator,
                message: "filter file ended with a block left open".to_string(),
            });
        }

        Ok(Filter {
            enabled: true,
            files,
            regions,
        })
    }

    pub fn match_file(&self, file: &str) -> bool {
        self.enabled && !self.files.passes(file)
    }

    pub fn match_function(&self, name: &str, mangled_name: &str) -> bool {
        self.enabled && !(self.regions.passes(name) || self.regions.passes(mangled_name))
    }

    /// `SCOREP_Filtering_Match`: a region is filtered out if its containing
    /// file is, regardless of what the region block says.
    pub fn match_region(&self, file: &str, name: &str, mangled_name: &str) -> bool {
        if self.match_file(file) {
            return true;
        }
        self.match_function(name, mangled_name)
    }
}

fn target_list<'a>(block: &'a mut PatternBlock, head: &str) -> &'a mut Vec<String> {
    if head == "INCLUDE" {
        &mut block.includes
    } else {
        &mut block.excludes
    }
}

fn unexpected_token(token: &str) -> ScorepError {
    ScorepError {
        code: ErrorCode::ParseNoSeparator,
        message: format!("unexpected token '{token}' in filter file"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn region_exclude_pattern_filters_matching_names_only() {
        let filter = Filter::parse(
            "SCOREP_REGION_NAMES_BEGIN\nEXCLUDE filtered*\nSCOREP_REGION_NAMES_END\n",
        )
        .unwrap();
        assert!(filter.match_region("a.c", "filtered1", "filtered1"));
        assert!(!filter.match_region("a.c", "filter_not1", "filter_not1"));
    }

    #[test]
    fn filtered_file_filters_every_region_in_it() {
        let filter = Filter::parse(
            "SCOREP_FILE_NAMES_BEGIN\nEXCLUDE *.cu\nSCOREP_FILE_NAMES_END\n\
             SCOREP_REGION_NAMES_BEGIN\nINCLUDE kernel\nSCOREP_REGION_NAMES_END\n",
        )
        .unwrap();
        assert!(filter.match_region("saxpy.cu", "kernel", "kernel"));
        assert!(!filter.match_region("saxpy.cpp", "kernel", "_Z6kernelv"));
        assert!(filter.match_region("saxpy.cpp", "helper", "_Z6helperv"));
    }

    #[test]
    fn region_matches_if_either_demangled_or_mangled_name_matches() {
        let filter =
            Filter::parse("SCOREP_REGION_NAMES_BEGIN\nINCLUDE foo\nSCOREP_REGION_NAMES_END\n")
                .unwrap();
        assert!(!filter.match_function("foo", "_Z3foov"));
        assert!(filter.match_function("bar", "_Z3barv"));
    }

    #[test]
    fn disabled_filter_never_filters_anything() {
        let filter = Filter::disabled();
        assert!(!filter.match_region("anything.c", "anything", "anything"));
    }

    #[test]
    fn unrecognized_line_inside_a_block_is_a_parse_error() {
        let err = Filter::parse("SCOREP_REGION_NAMES_BEGIN\nMAYBE foo\nSCOREP_REGION_NAMES_END\n");
        assert!(err.is_err());
    }

    #[test]
    fn include_line_outside_any_block_is_a_parse_error() {
        assert!(Filter::parse("INCLUDE foo\n").is_err());
    }

    #[test]
    fn comments_and_blank_lines_are_ignored() {
        let filter = Filter::parse(
            "# a comment\n\nSCOREP_REGION_NAMES_BEGIN\n  EXCLUDE filtered* # trailing comment\n\nSCOREP_REGION_NAMES_END\n",
        )
        .unwrap();
        assert!(filter.match_function("filtered1", "filtered1"));
    }
}
