use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::*;
use quill_diagnostics::Emitter;
use quill_driver::{analyze_expression, analyze_source, load_prelude, resolve_type_name, Analysis};
use quill_sema::{AnalyzerOptions, ScopeStack, TypedExpr, TypedExprKind};
use std::fs;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "quillc")]
#[command(about = "Quill 表达式分析器", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 分析源文件的每个顶层行
    Check {
        /// 输入文件
        input: String,

        #[command(flatten)]
        common: CommonArgs,
    },

    /// 分析单个表达式并输出类型树
    Expr {
        /// 表达式源码
        expression: String,

        /// 期望的结果类型
        #[arg(long)]
        expect: Option<String>,

        #[command(flatten)]
        common: CommonArgs,
    },
}

#[derive(Args)]
struct CommonArgs {
    /// 声明文件
    #[arg(short, long)]
    prelude: Option<String>,

    /// 在输出中保留副作用标记
    #[arg(long)]
    effects: bool,

    /// 关闭颜色输出
    #[arg(long)]
    no_color: bool,
}

impl CommonArgs {
    fn options(&self) -> AnalyzerOptions {
        AnalyzerOptions {
            track_effects: self.effects,
        }
    }

    fn emitter(&self) -> Emitter {
        if self.no_color {
            Emitter::without_colors()
        } else {
            Emitter::new()
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_env("QUILL_LOG"))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let failed = match cli.command {
        Commands::Check { input, common } => cmd_check(&input, &common)?,
        Commands::Expr {
            expression,
            expect,
            common,
        } => cmd_expr(&expression, expect.as_deref(), &common)?,
    };

    if failed {
        std::process::exit(1);
    }
    Ok(())
}

/// 加载声明文件；没有给出时使用空符号表
fn prelude(common: &CommonArgs) -> Result<Option<ScopeStack>> {
    let Some(path) = &common.prelude else {
        return Ok(Some(ScopeStack::new()));
    };
    let source = fs::read_to_string(path).with_context(|| format!("无法读取声明文件 {}", path))?;

    match load_prelude(&source) {
        Ok(symbols) => Ok(Some(symbols)),
        Err(err) => {
            err.emit(Some(path), Some(&source), !common.no_color);
            Ok(None)
        }
    }
}

/// 检查命令
fn cmd_check(input: &str, common: &CommonArgs) -> Result<bool> {
    let Some(symbols) = prelude(common)? else {
        return Ok(true);
    };
    let source = fs::read_to_string(input).with_context(|| format!("无法读取 {}", input))?;
    debug!(input, bytes = source.len(), "checking file");

    let analysis = match analyze_source(&symbols, input, &source, common.options()) {
        Ok(analysis) => analysis,
        Err(err) => {
            err.emit(Some(input), Some(&source), !common.no_color);
            return Ok(true);
        }
    };

    common
        .emitter()
        .with_source(input, source.as_str())
        .emit_all(analysis.sink.diagnostics());
    print_summary(input, &analysis);
    Ok(analysis.has_errors())
}

/// 表达式命令
fn cmd_expr(expression: &str, expect: Option<&str>, common: &CommonArgs) -> Result<bool> {
    let Some(symbols) = prelude(common)? else {
        return Ok(true);
    };

    let expected = match expect.map(|name| resolve_type_name(&symbols, name)).transpose() {
        Ok(expected) => expected,
        Err(err) => {
            err.emit(None, None, !common.no_color);
            return Ok(true);
        }
    };

    let analysis = match analyze_expression(&symbols, expression, expected.as_ref(), common.options())
    {
        Ok(analysis) => analysis,
        Err(err) => {
            err.emit(Some("<expr>"), Some(expression), !common.no_color);
            return Ok(true);
        }
    };

    common
        .emitter()
        .with_source("<expr>", expression)
        .emit_all(analysis.sink.diagnostics());
    for expr in analysis.exprs() {
        print_tree(expr, 0);
    }
    Ok(analysis.has_errors())
}

fn print_summary(input: &str, analysis: &Analysis) {
    let errors = analysis.sink.error_count();
    let warnings = analysis.sink.warning_count();
    let total = analysis.lines.len();
    let ok = analysis.exprs().count();

    if errors == 0 {
        println!(
            "{} {}: {} 个表达式, {} 个警告",
            "✔".green().bold(),
            input,
            total,
            warnings
        );
    } else {
        println!(
            "{} {}: {}/{} 个表达式通过, {} 个错误, {} 个警告",
            "✘".red().bold(),
            input,
            ok,
            total,
            errors,
            warnings
        );
    }
}

/// 缩进输出类型树
fn print_tree(expr: &TypedExpr, depth: usize) {
    let indent = "  ".repeat(depth);
    let mut flags = Vec::new();
    if expr.is_constant {
        flags.push("const");
    }
    if expr.has_effect == Some(true) {
        flags.push("effect");
    }
    let flags = if flags.is_empty() {
        String::new()
    } else {
        format!(" [{}]", flags.join(", "))
    };

    let ty = expr.result_type().to_string().cyan();
    match &expr.kind {
        TypedExprKind::Literal { value, .. } => {
            println!("{}literal {:?}: {}{}", indent, value, ty, flags)
        }
        TypedExprKind::Name(name) => println!("{}name {}: {}{}", indent, name, ty, flags),
        TypedExprKind::Tuple(items) | TypedExprKind::List(items) | TypedExprKind::Set(items) => {
            println!("{}{}{}", indent, ty, flags);
            for item in items {
                print_tree(item, depth + 1);
            }
        }
        TypedExprKind::Dict => println!("{}dict: {}{}", indent, ty, flags),
        TypedExprKind::Call { callee, args } => {
            println!("{}call {}: {}{}", indent, callee, ty, flags);
            for arg in args {
                print_tree(arg, depth + 1);
            }
        }
        TypedExprKind::StructInit { callee, fields, .. } => {
            println!("{}init {}: {}{}", indent, callee, ty, flags);
            for (name, field) in fields {
                println!("{}  .{} (expects {})", indent, name, field.expected);
                print_tree(&field.value, depth + 2);
            }
        }
        TypedExprKind::Unary { op, operand } => {
            println!("{}unary {}: {}{}", indent, op, ty, flags);
            print_tree(operand, depth + 1);
        }
        TypedExprKind::Binary { op, lhs, rhs } => {
            println!("{}binary {}: {}{}", indent, op, ty, flags);
            print_tree(lhs, depth + 1);
            print_tree(rhs, depth + 1);
        }
    }
}
