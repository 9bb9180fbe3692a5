//! # Console Frontend
//!
//! The launcher's window, drawn in a terminal. This is the single-threaded
//! event loop: render the current page, read one line, press the matching
//! control, repeat. A press runs to completion before the next line is read,
//! so while Excel works on a macro the launcher does not accept input.
//!
//! Keys: `m` shows the Measurement page, `1`-`10` press main buttons, `i1`-`i10`
//! open help documents, `?` lists the keys, `q` quits.

use std::io::{self, BufRead, Write};
use log::debug;
use crate::app::{AppContext, Outcome, WINDOW_TITLE};
use crate::pages::{Control, Page, Trigger};
use crate::registry;
use crate::system::SystemOps;

const GRID_COLUMNS: usize = 2;
const RULE: &str = "───────────────────────────────────────────────────────────────";

/// Runs the event loop until `q` or end of input.
pub fn run<S, R, W>(ctx: &mut AppContext<'_, S>, mut input: R, mut output: W) -> io::Result<()>
where
    S: SystemOps + ?Sized,
    R: BufRead,
    W: Write,
{
    loop {
        render(ctx, &mut output)?;
        let Some(line) = prompt(&mut input, &mut output, "> ")? else {
            break;
        };

        match line.as_str() {
            "" => continue,
            "q" | "quit" | "exit" => break,
            "?" | "help" => print_keys(&mut output)?,
            key => match ctx.press(key) {
                Some(Outcome::OpenForm(form)) => fill_form(ctx, form, &mut input, &mut output)?,
                Some(Outcome::Done) => {}
                None => writeln!(output, "No control '{}' on this page. Type ? for keys.", key)?,
            },
        }
    }
    debug!("Event loop finished");
    Ok(())
}

/// Draws the title, nav bar and current page.
pub fn render<S: SystemOps + ?Sized>(ctx: &AppContext<'_, S>, out: &mut impl Write) -> io::Result<()> {
    writeln!(out)?;
    let brands: Vec<&str> = [(registry::TE_LOGO, "[TE]"), (registry::GDMC_LOGO, "[GDMC]")]
        .into_iter()
        .filter(|(res, _)| ctx.has_decoration(*res))
        .map(|(_, tag)| tag)
        .collect();
    writeln!(out, "═══ {} ═══ {}", WINDOW_TITLE, brands.join(" "))?;

    let nav: Vec<String> = ctx.nav.iter().map(|b| format!("[{}] {}", b.key, b.text)).collect();
    writeln!(out, "{}", nav.join("   "))?;
    writeln!(out, "{}", RULE)?;

    if let Some(page) = ctx.pages.current() {
        render_page(page, out)?;
    }
    Ok(())
}

fn render_page(page: &Page, out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "  {}", page.title)?;
    writeln!(out)?;

    // A help button joins the main button that follows it into one cell.
    let mut cells: Vec<String> = Vec::new();
    let mut pending_help: Option<String> = None;
    for button in page.buttons() {
        if matches!(button.trigger(), Trigger::Help(_)) {
            pending_help = Some(button.key.clone());
            continue;
        }
        let cell = match pending_help.take() {
            Some(help) => format!("[{}][{}] {}", help, button.key, button.text),
            None => format!("[{}] {}", button.key, button.text),
        };
        cells.push(cell);
    }

    for row in cells.chunks(GRID_COLUMNS) {
        let line: Vec<String> = row.iter().map(|c| format!("{:<32}", c)).collect();
        writeln!(out, "  {}", line.join("").trim_end())?;
    }

    for control in &page.controls {
        if let Control::Label(label) = control {
            writeln!(out)?;
            writeln!(out, "  {}", label.text)?;
        }
    }
    Ok(())
}

fn print_keys(out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "  m        show the Measurement page")?;
    writeln!(out, "  1..10    press a button")?;
    writeln!(out, "  i1..i10  open the button's help document")?;
    writeln!(out, "  q        quit")
}

/// Fills in a form outside the event loop, for one-shot commands.
pub fn run_form<S, R, W>(ctx: &AppContext<'_, S>, form: Page, mut input: R, mut output: W) -> io::Result<()>
where
    S: SystemOps + ?Sized,
    R: BufRead,
    W: Write,
{
    fill_form(ctx, form, &mut input, &mut output)
}

/// Shows a transient form: one prompt per entry, then submit or cancel.
fn fill_form<S, R, W>(ctx: &AppContext<'_, S>, mut form: Page, input: &mut R, out: &mut W) -> io::Result<()>
where
    S: SystemOps + ?Sized,
    R: BufRead,
    W: Write,
{
    writeln!(out)?;
    writeln!(out, "─── {} ───", form.title)?;
    for entry in form.entries_mut() {
        let Some(value) = prompt(input, out, &format!("{} ", entry.label))? else {
            return Ok(());
        };
        entry.set(value);
    }

    let Some(answer) = prompt(input, out, "[s] Submit, anything else cancels: ")? else {
        return Ok(());
    };
    if form.button(&answer).is_some_and(|b| *b.trigger() == Trigger::SubmitLinkForm) {
        ctx.submit_link_form(&form);
    }
    Ok(())
}

/// Writes `label`, reads one trimmed line. `None` at end of input.
fn prompt(input: &mut impl BufRead, out: &mut impl Write, label: &str) -> io::Result<Option<String>> {
    write!(out, "{}", label)?;
    out.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}
