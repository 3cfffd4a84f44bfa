//! Line-oriented terminal implementation of [`TodoView`].
//!
//! Prints the record text and a menu, then prompts for the inputs of the
//! chosen action. End of input counts as closing the window.

use async_trait::async_trait;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

use super::view::{FormValues, TodoView, ViewEvent};

const MENU: &str = "[a]dd  [u]pdate  [d]elete  e[x]it > ";

/// Terminal view over any async line reader and writer.
pub struct TerminalView<R, W> {
    reader: R,
    writer: W,
    form: FormValues,
}

impl TerminalView<BufReader<tokio::io::Stdin>, tokio::io::Stdout> {
    /// View bound to the process's stdin and stdout.
    pub fn stdio() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
    }
}

impl<R, W> TerminalView<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            reader,
            writer,
            form: FormValues::default(),
        }
    }

    /// Current input values.
    pub fn form(&self) -> &FormValues {
        &self.form
    }

    /// Consume the view, returning the writer.
    pub fn into_writer(self) -> W {
        self.writer
    }

    async fn write(&mut self, text: &str) -> crate::error::Result<()> {
        self.writer.write_all(text.as_bytes()).await?;
        self.writer.flush().await?;
        Ok(())
    }

    /// Read one line, without its terminator. `None` at end of input.
    async fn read_line(&mut self) -> crate::error::Result<Option<String>> {
        let mut line = String::new();
        if self.reader.read_line(&mut line).await? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_owned()))
    }

    async fn prompt(&mut self, label: &str) -> crate::error::Result<Option<String>> {
        self.write(&format!("{label}: ")).await?;
        Ok(self.read_line().await?.map(|v| v.trim().to_owned()))
    }

    /// Prompt for the record fields. `false` at end of input.
    async fn prompt_fields(&mut self) -> crate::error::Result<bool> {
        let Some(label) = self.prompt("LABEL (optional)").await? else {
            return Ok(false);
        };
        self.form.label = label;
        let Some(name) = self.prompt("NAME").await? else {
            return Ok(false);
        };
        self.form.name = name;
        let Some(description) = self.prompt("DESCRIPTION").await? else {
            return Ok(false);
        };
        self.form.description = description;
        let Some(date) = self.prompt("DATE").await? else {
            return Ok(false);
        };
        self.form.date = date;
        let Some(importance) = self.prompt("IMPORTANCE").await? else {
            return Ok(false);
        };
        self.form.importance = importance;
        Ok(true)
    }

    async fn prompt_id(&mut self) -> crate::error::Result<bool> {
        match self.prompt("ID").await? {
            Some(id) => {
                self.form.id = id;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl<R, W> TodoView for TerminalView<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    async fn read_event(&mut self) -> crate::error::Result<ViewEvent> {
        loop {
            self.write(MENU).await?;
            let Some(choice) = self.read_line().await? else {
                return Ok(ViewEvent::Closed);
            };
            let event = match choice.trim().to_ascii_lowercase().as_str() {
                "a" | "add" => {
                    if !self.prompt_fields().await? {
                        return Ok(ViewEvent::Closed);
                    }
                    ViewEvent::Add(self.form.clone())
                }
                "u" | "update" => {
                    if !self.prompt_id().await? || !self.prompt_fields().await? {
                        return Ok(ViewEvent::Closed);
                    }
                    ViewEvent::Update(self.form.clone())
                }
                "d" | "delete" => {
                    if !self.prompt_id().await? {
                        return Ok(ViewEvent::Closed);
                    }
                    ViewEvent::Delete(self.form.clone())
                }
                "x" | "exit" | "q" | "quit" => ViewEvent::Closed,
                "" => continue,
                other => {
                    self.write(&format!("unknown action '{other}'\n")).await?;
                    continue;
                }
            };
            return Ok(event);
        }
    }

    async fn show_records(&mut self, text: &str) -> crate::error::Result<()> {
        self.write(&format!("\nTodo Items{text}")).await
    }

    async fn clear_inputs(&mut self) -> crate::error::Result<()> {
        self.form.clear();
        Ok(())
    }

    async fn show_error(&mut self, message: &str) -> crate::error::Result<()> {
        self.write(&format!("error: {message}\n")).await
    }

    async fn close(&mut self) -> crate::error::Result<()> {
        self.writer.shutdown().await?;
        Ok(())
    }
}
