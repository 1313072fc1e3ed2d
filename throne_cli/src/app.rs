//! The read-eval-render loop.

use std::io::{BufRead, Write};

use narrative_core::{GameView, SaveStore, Screen, Session};

use crate::commands::{self, Command};
use crate::terminal::TerminalView;

const UNKNOWN_COMMAND_TEXT: &str = "无法识别的指令，输入 ? 查看帮助。";
const NO_SUCH_OPTION_TEXT: &str = "没有这个选项。";
const CONFIRM_MENU_TEXT: &str = "确定要返回主菜单吗？你的进度将会丢失，除非你已保存。";

/// Drive `session` from `input` until the player quits or input runs out.
pub fn run<W, S, R>(session: &mut Session<TerminalView<W>, S>, input: R) -> anyhow::Result<()>
where
    W: Write,
    S: SaveStore,
    R: BufRead,
{
    let mut lines = input.lines();
    show_menu(session);

    loop {
        session.view_mut().prompt();
        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;
        let screen = session.screen();

        let Some(command) = commands::parse(screen, &line) else {
            session.view_mut().show_message(UNKNOWN_COMMAND_TEXT);
            continue;
        };

        match command {
            Command::Quit => break,
            Command::Help => session.view_mut().show_help(),
            Command::NewGame => session.new_game(),
            Command::Load => {
                session.load();
            }
            Command::Allocate(attribute, step) => {
                // refusal is already shown by the session
                session.allocate(attribute, step).ok();
            }
            Command::Confirm => {
                session.confirm_attributes();
            }
            Command::Choose(index) => {
                if !session.choose(index) {
                    session.view_mut().show_message(NO_SUCH_OPTION_TEXT);
                }
            }
            Command::Save => {
                session.save();
            }
            Command::Sheet => session.view_mut().show_sheet(),
            Command::Inventory => session.view_mut().show_inventory(),
            Command::Menu => {
                if screen == Screen::Playing {
                    session.view_mut().ask(CONFIRM_MENU_TEXT);
                    let answer = lines.next().transpose()?.unwrap_or_default();
                    if !matches!(answer.trim(), "y" | "Y") {
                        session.render();
                        continue;
                    }
                }
                session.return_to_menu();
                show_menu(session);
            }
        }
    }

    Ok(())
}

fn show_menu<W: Write, S: SaveStore>(session: &mut Session<TerminalView<W>, S>) {
    let has_save = session.has_save();
    session.view_mut().show_menu(has_save);
}
