//! Shared test helpers. Behavioural tests run against both execution
//! paths: the native yielder engine and, where the pattern allows it, the
//! delegating path. Extended patterns take the native path in either
//! configuration.

use retrack::{compile, Pattern};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Engine {
    Native,
    Delegating,
}

#[derive(Debug, Copy, Clone)]
pub struct TestConfig {
    pub engine: Engine,
}

/// Run a test body against both engine configurations.
pub fn test_with_configs(f: fn(TestConfig)) {
    f(TestConfig {
        engine: Engine::Native,
    });
    f(TestConfig {
        engine: Engine::Delegating,
    });
}

impl TestConfig {
    pub fn compile(&self, pattern: &str) -> TestCompiled {
        let mut re =
            compile(pattern).unwrap_or_else(|err| panic!("compile({:?}): {}", pattern, err));
        if self.engine == Engine::Native {
            re.no_delegate();
        }
        TestCompiled { re }
    }

}

pub struct TestCompiled {
    pub re: Pattern,
}

impl TestCompiled {
    pub fn longest(mut self) -> Self {
        self.re.longest();
        self
    }

    pub fn indices(&self, text: &str) -> Option<Vec<isize>> {
        self.re.find_submatch_index(text.as_bytes(), 0)
    }

    /// Format the first match as "whole,group1,group2,..", with empty
    /// text for groups that did not participate.
    pub fn match1(&self, text: &str) -> String {
        let m = self
            .indices(text)
            .unwrap_or_else(|| panic!("pattern should match {:?}", text));
        format_match(&m, text)
    }

    /// The whole-match text of every match.
    pub fn match_all(&self, text: &str) -> Vec<String> {
        self.re
            .find_all_submatch_index(text.as_bytes(), -1)
            .iter()
            .map(|m| text[m[0] as usize..m[1] as usize].to_string())
            .collect()
    }

    #[track_caller]
    pub fn test_succeeds(&self, text: &str) {
        assert!(
            self.indices(text).is_some(),
            "pattern should match {:?}",
            text
        );
    }

    #[track_caller]
    pub fn test_fails(&self, text: &str) {
        assert!(
            self.indices(text).is_none(),
            "pattern should not match {:?}",
            text
        );
    }
}

pub fn format_match(m: &[isize], text: &str) -> String {
    let mut result = text[m[0] as usize..m[1] as usize].to_string();
    for pair in m[2..].chunks(2) {
        result.push(',');
        if pair[0] >= 0 {
            result.push_str(&text[pair[0] as usize..pair[1] as usize]);
        }
    }
    result
}

pub trait StringTestHelpers {
    /// "Fluent" style helper for testing that a String equals a str.
    fn test_eq(&self, s: &str);
}

impl StringTestHelpers for String {
    #[track_caller]
    fn test_eq(&self, rhs: &str) {
        assert_eq!(self.as_str(), rhs)
    }
}

pub trait VecTestHelpers {
    fn test_eq(&self, rhs: Vec<&str>);
}

impl VecTestHelpers for Vec<String> {
    #[track_caller]
    fn test_eq(&self, rhs: Vec<&str>) {
        assert_eq!(self.len(), rhs.len(), "match counts differ");
        for (lhs, rhs) in self.iter().zip(rhs.iter()) {
            assert_eq!(lhs, rhs);
        }
    }
}
