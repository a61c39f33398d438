//! 文字 CLI：读取 stdin → 解析命令 → 转成背包事件

use anyhow::{Context, bail};
use bevy::app::AppExit;
use bevy::prelude::*;
use once_cell::sync::Lazy;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use crate::core::{events::LogEvent, states::AppState};
use crate::data::LoadedCatalog;
use crate::data::schema::ItemEntry;
use crate::inventory::events::*;
use crate::inventory::{InventoryGrid, SortKey};

static CLI_BUFFER: Lazy<Arc<Mutex<VecDeque<String>>>> =
    Lazy::new(|| Arc::new(Mutex::new(VecDeque::new())));

/// 插件入口
pub struct DebugCliPlugin;
impl Plugin for DebugCliPlugin {
    fn build(&self, app: &mut App) {
        {
            let buffer = CLI_BUFFER.clone();
            std::thread::spawn(move || {
                use std::io::{self, BufRead};
                let stdin = io::stdin();
                for line in stdin.lock().lines().map_while(Result::ok) {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    if let Ok(mut buf) = buffer.lock() {
                        buf.push_back(line.to_string());
                    }
                }
            });
        }
        app
            // 事件：原始输入行
            .add_event::<CliLine>()
            // 每帧从 buffer 取出所有命令行写入事件
            .add_systems(Update, read_stdin)
            // 仅在 InGame 处理命令
            .add_systems(
                Update,
                execute_cli_commands.run_if(in_state(AppState::InGame)),
            );
    }
}

/* ---------------------------- 事件与枚举 ---------------------------- */

/// 终端敲的一整行
#[derive(Event)]
struct CliLine(String);

/// 我们支持的命令
#[derive(Debug, PartialEq, Eq)]
enum Command {
    Help,
    Status,
    Exit,
    Items(Option<String>), // None=全部；Some(token)=按 id/uuid/name 查询
    Give { item: String, count: u32 },
    Inventory,
    Move { from: usize, to: usize, merge: bool },
    Drop { index: Option<usize>, amount: Option<u32> },
    Use(Option<usize>),
    Select(Option<usize>),
    Sort { key: SortKey, ascending: bool },
    Snapshot(SnapshotEvent),
}

const HELP: &str = "命令列表:
  help                       查看帮助
  status                     查看当前状态
  exit / quit                退出程序
  items [token]              列出物品 / 用 id、uuid、名称查询
  give <item> [count]        放入物品（默认 1 个）
  inventory                  查看背包
  move <from> <to> [swap]    移动；加 swap 只交换不合并
  drop [index] [amount]      丢弃（省略 index 则用选中格）
  use [index]                使用（省略 index 则用选中格）
  select <index> | none      选中格子 / 取消选中
  sort <name|type|count> [asc|desc]
  save / load / dump         内存存档 / 读档 / 打印 JSON";

/* ---------------------------- 读取 stdin ---------------------------- */

fn read_stdin(mut writer: EventWriter<CliLine>) {
    let Ok(mut buffer) = CLI_BUFFER.lock() else {
        return;
    };
    while let Some(line) = buffer.pop_front() {
        writer.write(CliLine(line));
    }
}

/* ---------------------------- 命令执行 ---------------------------- */

#[derive(bevy::ecs::system::SystemParam)]
struct InventoryWriters<'w> {
    give: EventWriter<'w, GiveItemEvent>,
    moves: EventWriter<'w, MoveItemEvent>,
    drop: EventWriter<'w, DropItemEvent>,
    use_item: EventWriter<'w, UseItemEvent>,
    select: EventWriter<'w, SelectSlotEvent>,
    sort: EventWriter<'w, SortInventoryEvent>,
    snapshot: EventWriter<'w, SnapshotEvent>,
    list: EventWriter<'w, ListInventoryEvent>,
}

fn execute_cli_commands(
    mut line_reader: EventReader<CliLine>,
    mut app_exit: EventWriter<AppExit>,
    mut log: EventWriter<LogEvent>,
    mut inv: InventoryWriters,
    state: Res<State<AppState>>,
    catalog: Res<LoadedCatalog>,
    grid: Res<InventoryGrid>,
) {
    for CliLine(input) in line_reader.read() {
        let command = match parse_command(input) {
            Ok(command) => command,
            Err(err) => {
                log.write(LogEvent(format!("{err:#}")));
                continue;
            }
        };

        match command {
            Command::Help => {
                log.write(LogEvent(HELP.into()));
            }

            Command::Status => {
                let occupied = grid.slots().iter().filter(|s| !s.is_empty()).count();
                log.write(LogEvent(format!(
                    "State: {:?}, Items Loaded: {}, Slots: {}/{} ({}x{})",
                    state.get(),
                    catalog.0.len(),
                    occupied,
                    grid.len(),
                    grid.rows(),
                    grid.cols()
                )));
            }

            Command::Exit => {
                log.write(LogEvent("Bye~".into()));
                app_exit.write(AppExit::Success);
            }

            Command::Items(None) => {
                for entry in catalog.0.items() {
                    log.write(LogEvent(format!(
                        "{} | {} | {}",
                        uuid_from_id(&entry.id),
                        entry.id,
                        entry.name
                    )));
                }
            }

            Command::Items(Some(token)) => match find_item(&catalog, &token) {
                Some(e) => {
                    log.write(LogEvent(describe(e)));
                }
                None => {
                    log.write(LogEvent("未找到匹配物品".into()));
                }
            },

            Command::Give { item, count } => {
                // 允许按名称给予
                let id = find_item(&catalog, &item).map_or(item, |e| e.id.clone());
                inv.give.write(GiveItemEvent { id, count });
            }

            Command::Inventory => {
                inv.list.write(ListInventoryEvent);
            }

            Command::Move { from, to, merge } => {
                inv.moves.write(MoveItemEvent { from, to, merge });
                inv.list.write(ListInventoryEvent);
            }

            Command::Drop { index, amount } => {
                inv.drop.write(DropItemEvent { index, amount });
            }

            Command::Use(index) => {
                inv.use_item.write(UseItemEvent { index });
            }

            Command::Select(index) => {
                inv.select.write(SelectSlotEvent(index));
            }

            Command::Sort { key, ascending } => {
                inv.sort.write(SortInventoryEvent { key, ascending });
                inv.list.write(ListInventoryEvent);
            }

            Command::Snapshot(ev) => {
                inv.snapshot.write(ev);
            }
        }
    }
}

/* ---------------------------- 工具函数 ---------------------------- */

fn parse_index(token: &str) -> anyhow::Result<usize> {
    token
        .parse()
        .with_context(|| format!("无效的格子索引: {token}"))
}

fn parse_command(input: &str) -> anyhow::Result<Command> {
    let mut parts = input.split_whitespace();
    let cmd = parts.next().unwrap_or("").to_lowercase();
    let command = match cmd.as_str() {
        "help" | "h" | "?" => Command::Help,
        "status" | "s" => Command::Status,
        "exit" | "quit" | "q" => Command::Exit,
        "items" | "item" | "i" => Command::Items(parts.next().map(str::to_string)),
        "give" => {
            let item = parts.next().context("用法: give <item> [count]")?.to_string();
            let count = match parts.next() {
                Some(c) => c.parse().with_context(|| format!("无效的数量: {c}"))?,
                None => 1,
            };
            Command::Give { item, count }
        }
        "inventory" | "inv" => Command::Inventory,
        "move" | "mv" => {
            let from = parse_index(parts.next().context("用法: move <from> <to> [swap]")?)?;
            let to = parse_index(parts.next().context("用法: move <from> <to> [swap]")?)?;
            let merge = !matches!(parts.next(), Some("swap" | "nomerge"));
            Command::Move { from, to, merge }
        }
        "drop" => {
            let index = parts.next().map(parse_index).transpose()?;
            let amount = match parts.next() {
                None | Some("all") => None,
                Some(a) => Some(a.parse().with_context(|| format!("无效的数量: {a}"))?),
            };
            Command::Drop { index, amount }
        }
        "use" => Command::Use(parts.next().map(parse_index).transpose()?),
        "select" | "sel" => match parts.next() {
            None | Some("none" | "clear") => Command::Select(None),
            Some(i) => Command::Select(Some(parse_index(i)?)),
        },
        "sort" => {
            let key = match parts.next().unwrap_or("name") {
                "name" => SortKey::Name,
                "type" => SortKey::Type,
                "count" => SortKey::Count,
                other => bail!("未知排序键: {other}"),
            };
            let ascending = !matches!(parts.next(), Some("desc"));
            Command::Sort { key, ascending }
        }
        "save" => Command::Snapshot(SnapshotEvent::Save),
        "load" => Command::Snapshot(SnapshotEvent::Load),
        "dump" => Command::Snapshot(SnapshotEvent::Dump),
        other => bail!("不支持的命令: {other}"),
    };
    Ok(command)
}

/// 按 id / 名称 / uuid 查找
fn find_item<'a>(catalog: &'a LoadedCatalog, token: &str) -> Option<&'a ItemEntry> {
    catalog.0.find(token).or_else(|| {
        let token = token.to_lowercase();
        catalog
            .0
            .items()
            .iter()
            .find(|e| uuid_from_id(&e.id).to_string() == token)
    })
}

fn describe(e: &ItemEntry) -> String {
    format!(
        "==================================================
UUID  : {}
ID    : {}
Name  : {}
Type  : {:?}
Stack : {}
Desc  : {}
==================================================",
        uuid_from_id(&e.id),
        e.id,
        e.name,
        e.item_type,
        if e.stackable { format!("×{}", e.stack_limit()) } else { "不可堆叠".into() },
        e.description
    )
}

fn uuid_from_id(id: &str) -> Uuid {
    // 用固定 namespace + id 字节生成版本 5 UUID，保证可重复得到同一值
    Uuid::new_v5(&Uuid::NAMESPACE_OID, id.as_bytes())
}
