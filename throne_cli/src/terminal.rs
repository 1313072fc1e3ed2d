//! A [`GameView`] that writes plain text to a terminal.

use std::io::Write;

use game_rules::{Attribute, Ending, Player};
use narrative_core::{CharacterSheet, GameView, Scene};
use tracing::warn;

const RULE: &str = "----------------------------------------";

pub struct TerminalView<W: Write> {
    out: W,
    /// Latest sheet, kept for the `c` and `i` commands.
    sheet: Option<CharacterSheet>,
}

impl<W: Write> TerminalView<W> {
    pub fn new(out: W) -> Self {
        Self { out, sheet: None }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, text: impl AsRef<str>) {
        if let Err(err) = writeln!(self.out, "{}", text.as_ref()) {
            warn!(error = %err, "failed to write to terminal");
        }
    }

    fn flush(&mut self) {
        if let Err(err) = self.out.flush() {
            warn!(error = %err, "failed to flush terminal");
        }
    }

    pub fn prompt(&mut self) {
        if let Err(err) = write!(self.out, "> ") {
            warn!(error = %err, "failed to write to terminal");
        }
        self.flush();
    }

    pub fn show_menu(&mut self, has_save: bool) {
        self.line(RULE);
        self.line("被遗忘的王座");
        self.line(RULE);
        self.line("1. 新游戏");
        if has_save {
            self.line("2. 载入游戏");
        }
        self.line("q. 退出");
        self.flush();
    }

    pub fn show_help(&mut self) {
        self.line("主菜单: 1 新游戏, 2 载入游戏, q 退出");
        self.line("创建角色: +属性 / -属性 / ++属性 / --属性 调整点数, ok 开始旅程");
        self.line("游戏中: 输入选项编号, s 保存, c 角色信息, i 物品栏, q 返回主菜单");
        self.flush();
    }

    pub fn show_sheet(&mut self) {
        let Some(sheet) = self.sheet.clone() else {
            return;
        };
        self.line(RULE);
        self.line(sheet.chapter);
        self.line(&sheet.calendar);
        for line in sheet.lines() {
            self.line(line);
        }
        self.flush();
    }

    pub fn show_inventory(&mut self) {
        let Some(sheet) = self.sheet.clone() else {
            return;
        };
        self.line(RULE);
        self.line("物品栏");
        if sheet.inventory.is_empty() {
            self.line("空空如也。");
        }
        for entry in &sheet.inventory {
            if entry.tooltip.is_empty() {
                self.line(format!("- {}", entry.name));
                continue;
            }
            self.line(format!("- {}", entry.tooltip.join(" | ")));
        }
        self.flush();
    }

    /// Ask a yes/no question; the answer is read by the caller.
    pub fn ask(&mut self, question: &str) {
        self.line(format!("{question} (y/n)"));
        self.prompt();
    }
}

impl<W: Write> GameView for TerminalView<W> {
    fn clear_choices(&mut self) {
        self.line("");
    }

    fn show_scene(&mut self, scene: &Scene) {
        self.line(RULE);
        let text = scene.full_text();
        if !text.is_empty() {
            self.line(text);
        }
        for (index, option) in scene.options.iter().enumerate() {
            self.line(format!("{}. {}", index + 1, option.text));
        }
        self.flush();
    }

    fn show_character(&mut self, sheet: &CharacterSheet) {
        self.line(format!(
            "[{}] {} | 生命值 {}/{} | 体力 {}/{}",
            sheet.chapter,
            sheet.calendar,
            sheet.current_hp,
            sheet.max_hp,
            sheet.stamina,
            sheet.max_stamina
        ));
        self.sheet = Some(sheet.clone());
        self.flush();
    }

    fn show_creation(&mut self, player: &Player, attribute_cap: i32) {
        self.line(RULE);
        self.line(format!("分配属性点 (剩余: {}, 单项上限: {attribute_cap})", player.points_left));
        for attribute in Attribute::ALL {
            self.line(format!("  {attribute}: {}", player.attributes.get(attribute)));
        }
        self.line("输入 +属性 / -属性 / ++属性 / --属性 调整，ok 开始旅程");
        self.flush();
    }

    fn show_ending(&mut self, ending: &Ending) {
        self.line(RULE);
        self.line(format!("【结局】{}", ending.title));
        self.line(&ending.description);
        self.line("按回车返回主菜单。");
        self.sheet = None;
        self.flush();
    }

    fn show_message(&mut self, message: &str) {
        self.line(format!("* {message}"));
        self.flush();
    }
}
