use async_trait::async_trait;
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines, Stdin};
use yadfs_core::{Confirmer, Result};

/// Line-oriented operator input. The same reader serves commands and
/// confirmations so no buffered input is lost between them.
pub struct Terminal<R> {
    lines: Lines<R>,
}

impl Terminal<BufReader<Stdin>> {
    pub fn stdin() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()))
    }
}

impl<R: AsyncBufRead + Unpin> Terminal<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
        }
    }

    /// Prints `prompt` without a newline and waits for one line. `None` on end of input.
    pub async fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        let mut stdout = std::io::stdout();
        write!(stdout, "{}", prompt)?;
        stdout.flush()?;

        Ok(self.lines.next_line().await?)
    }
}

#[async_trait]
impl<R: AsyncBufRead + Unpin + Send> Confirmer for Terminal<R> {
    async fn ask(&mut self, prompt: &str) -> Result<Option<String>> {
        self.read_line(prompt).await
    }

    fn reject(&mut self, _answer: &str) {
        println!("Incorrect input");
    }
}
