// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use stackwatch_core::{Error, Result};
use std::collections::VecDeque;
use std::fmt::Debug;
use std::io::{BufRead, Write};
use std::sync::{Arc, Mutex};

/// Console receives the human readable report and answers confirmations.
pub trait Console: Debug + Send + Sync + 'static {
    /// Print `text` followed by a newline.
    fn print(&self, text: &str);

    /// Write `text` as is to the error stream.
    fn eprint(&self, text: &str);

    /// Show `question` and read one line, without its line ending.
    fn prompt(&self, question: &str) -> Result<String>;
}

/// Console on the process stdout, stderr and stdin.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdConsole;

impl Console for StdConsole {
    fn print(&self, text: &str) {
        println!("{text}");
    }

    fn eprint(&self, text: &str) {
        eprint!("{text}");
    }

    fn prompt(&self, question: &str) -> Result<String> {
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(question.as_bytes())?;
        stdout.flush()?;

        let mut answer = String::new();
        std::io::stdin().lock().read_line(&mut answer)?;
        if answer.is_empty() {
            return Err(Error::unexpected("stdin closed before an answer was given"));
        }
        Ok(answer.trim_end_matches(|c: char| c == '\r' || c == '\n').to_string())
    }
}

/// Console that records everything and replays scripted answers.
///
/// Clones share the same buffers.
#[derive(Debug, Clone, Default)]
pub struct MemoryConsole {
    output: Arc<Mutex<String>>,
    errors: Arc<Mutex<String>>,
    answers: Arc<Mutex<VecDeque<String>>>,
}

impl MemoryConsole {
    /// Queue an answer for the next prompt.
    pub fn with_answer(self, answer: &str) -> Self {
        self.answers
            .lock()
            .expect("lock poisoned")
            .push_back(answer.to_string());
        self
    }

    /// Everything printed so far, prompts included.
    pub fn output(&self) -> String {
        self.output.lock().expect("lock poisoned").clone()
    }

    /// Everything written to the error stream so far.
    pub fn errors(&self) -> String {
        self.errors.lock().expect("lock poisoned").clone()
    }
}

impl Console for MemoryConsole {
    fn print(&self, text: &str) {
        let mut output = self.output.lock().expect("lock poisoned");
        output.push_str(text);
        output.push('\n');
    }

    fn eprint(&self, text: &str) {
        self.errors.lock().expect("lock poisoned").push_str(text);
    }

    fn prompt(&self, question: &str) -> Result<String> {
        self.output.lock().expect("lock poisoned").push_str(question);
        self.answers
            .lock()
            .expect("lock poisoned")
            .pop_front()
            .ok_or_else(|| Error::unexpected("no answer left"))
    }
}
