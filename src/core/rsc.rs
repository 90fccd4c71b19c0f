//! Client/server module classification for `auto` mode.
//!
//! A file name or a leading directive settles the question outright. Otherwise each
//! signal (imports, hook calls, event-handler props, route exports) adds to a client
//! or server score and the difference decides.

use serde::Serialize;
use swc_ecma_ast::{
    CallExpr, Callee, Decl, Expr, ImportSpecifier, JSXAttr, JSXAttrName, MemberProp, Module,
    ModuleDecl, ModuleExportName, ModuleItem, Pat, Stmt,
};
use swc_ecma_visit::{Visit, VisitWith};

const SERVER_MODULES: &[&str] = &["next/headers", "next/cache", "server-only"];
const CLIENT_MODULES: &[&str] = &["next/navigation", "client-only"];

const REACT_CLIENT_HOOKS: &[&str] = &[
    "useState",
    "useEffect",
    "useLayoutEffect",
    "useReducer",
    "useCallback",
    "useMemo",
    "useRef",
    "useImperativeHandle",
    "useContext",
    "useSyncExternalStore",
    "useTransition",
    "useDeferredValue",
    "useId",
    "useInsertionEffect",
];

const NEXT_CLIENT_HOOKS: &[&str] = &[
    "useRouter",
    "usePathname",
    "useSearchParams",
    "useParams",
    "useSelectedLayoutSegment",
    "useSelectedLayoutSegments",
];

const SERVER_APIS: &[&str] = &[
    "headers",
    "cookies",
    "draftMode",
    "notFound",
    "redirect",
    "permanentRedirect",
];

const SERVER_EXPORT_FUNCTIONS: &[&str] =
    &["generateMetadata", "generateStaticParams", "generateViewport"];
const SERVER_EXPORT_VARIABLES: &[&str] = &["dynamic", "revalidate", "fetchCache", "runtime"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleKind {
    Client,
    Server,
}

impl std::fmt::Display for ModuleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModuleKind::Client => write!(f, "client"),
            ModuleKind::Server => write!(f, "server"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Detection {
    pub kind: ModuleKind,
    /// 0-100.
    pub confidence: u8,
    pub reasons: Vec<String>,
}

impl Detection {
    fn certain(kind: ModuleKind, reason: String) -> Self {
        Self {
            kind,
            confidence: 100,
            reasons: vec![reason],
        }
    }
}

#[derive(Default)]
struct Scores {
    client: i32,
    server: i32,
    reasons: Vec<String>,
}

impl Scores {
    fn client(&mut self, points: i32, reason: impl std::fmt::Display) {
        self.client += points;
        self.reasons.push(format!("{} (+{} client)", reason, points));
    }

    fn server(&mut self, points: i32, reason: impl std::fmt::Display) {
        self.server += points;
        self.reasons.push(format!("{} (+{} server)", reason, points));
    }

    fn into_detection(self) -> Detection {
        let total = self.client - self.server;
        let (kind, confidence) = match total {
            0 => (ModuleKind::Server, 50),
            t => {
                let kind = if t > 0 {
                    ModuleKind::Client
                } else {
                    ModuleKind::Server
                };
                (kind, (t.unsigned_abs() * 2).clamp(60, 100) as u8)
            }
        };
        Detection {
            kind,
            confidence,
            reasons: self.reasons,
        }
    }
}

/// Classify a module as a client or server component module.
pub fn detect_module_kind(file_path: &str, module: &Module) -> Detection {
    if let Some(kind) = kind_from_file_name(file_path) {
        return Detection::certain(kind, format!("file name marks a {} module", kind));
    }
    if let Some(kind) = kind_from_directive(module) {
        return Detection::certain(kind, format!("\"use {}\" directive", kind));
    }

    let mut scores = Scores::default();
    score_imports(module, &mut scores);
    score_exports(module, &mut scores);

    let mut usage = UsageScorer {
        scores: &mut scores,
    };
    module.visit_with(&mut usage);

    scores.into_detection()
}

fn kind_from_file_name(file_path: &str) -> Option<ModuleKind> {
    let name = file_path.rsplit(['/', '\\']).next().unwrap_or(file_path);
    if name.ends_with(".client.tsx") || name.ends_with(".client.jsx") {
        Some(ModuleKind::Client)
    } else if name.ends_with(".server.tsx") || name.ends_with(".server.jsx") {
        Some(ModuleKind::Server)
    } else {
        None
    }
}

fn kind_from_directive(module: &Module) -> Option<ModuleKind> {
    for item in &module.body {
        let ModuleItem::Stmt(Stmt::Expr(stmt)) = item else {
            break;
        };
        let Expr::Lit(swc_ecma_ast::Lit::Str(s)) = &*stmt.expr else {
            break;
        };
        match s.value.as_str() {
            Some("use client") => return Some(ModuleKind::Client),
            Some("use server") => return Some(ModuleKind::Server),
            _ => {}
        }
    }
    None
}

fn imported_name(spec: &ImportSpecifier) -> Option<&str> {
    match spec {
        ImportSpecifier::Named(named) => match &named.imported {
            None => Some(&*named.local.sym),
            Some(ModuleExportName::Ident(ident)) => Some(&*ident.sym),
            Some(ModuleExportName::Str(s)) => s.value.as_str(),
        },
        _ => None,
    }
}

fn score_imports(module: &Module, scores: &mut Scores) {
    for item in &module.body {
        let ModuleItem::ModuleDecl(ModuleDecl::Import(import)) = item else {
            continue;
        };
        if let Some(src) = import.src.value.as_str() {
            if SERVER_MODULES.contains(&src) {
                scores.server(30, format_args!("imports \"{}\"", src));
            } else if CLIENT_MODULES.contains(&src) {
                scores.client(30, format_args!("imports \"{}\"", src));
            }
        }
        for name in import.specifiers.iter().filter_map(imported_name) {
            if REACT_CLIENT_HOOKS.contains(&name) {
                scores.client(20, format_args!("imports {}", name));
            } else if NEXT_CLIENT_HOOKS.contains(&name) {
                scores.client(25, format_args!("imports {}", name));
            } else if SERVER_APIS.contains(&name) {
                scores.server(25, format_args!("imports {}", name));
            }
        }
    }
}

fn score_exports(module: &Module, scores: &mut Scores) {
    for item in &module.body {
        let ModuleItem::ModuleDecl(ModuleDecl::ExportDecl(export)) = item else {
            continue;
        };
        match &export.decl {
            Decl::Fn(f) if SERVER_EXPORT_FUNCTIONS.contains(&&*f.ident.sym) => {
                scores.server(30, format_args!("exports {}", f.ident.sym));
            }
            Decl::Var(var) => {
                for decl in &var.decls {
                    if let Pat::Ident(binding) = &decl.name
                        && SERVER_EXPORT_VARIABLES.contains(&&*binding.id.sym)
                    {
                        scores.server(25, format_args!("exports {}", binding.id.sym));
                    }
                }
            }
            _ => {}
        }
    }
}

struct UsageScorer<'a> {
    scores: &'a mut Scores,
}

impl Visit for UsageScorer<'_> {
    fn visit_call_expr(&mut self, node: &CallExpr) {
        if let Callee::Expr(callee) = &node.callee {
            let name = match &**callee {
                Expr::Ident(ident) => Some(&*ident.sym),
                Expr::Member(member) => match &member.prop {
                    MemberProp::Ident(prop) => Some(&*prop.sym),
                    _ => None,
                },
                _ => None,
            };
            if let Some(name) = name {
                if REACT_CLIENT_HOOKS.contains(&name) {
                    self.scores.client(15, format_args!("calls {}", name));
                } else if NEXT_CLIENT_HOOKS.contains(&name) {
                    self.scores.client(20, format_args!("calls {}", name));
                } else if SERVER_APIS.contains(&name) {
                    self.scores.server(20, format_args!("calls {}", name));
                }
            }
        }
        node.visit_children_with(self);
    }

    fn visit_jsx_attr(&mut self, node: &JSXAttr) {
        if let JSXAttrName::Ident(name) = &node.name {
            let mut chars = name.sym.chars();
            if chars.next() == Some('o')
                && chars.next() == Some('n')
                && chars.next().is_some_and(|c| c.is_ascii_uppercase())
            {
                self.scores
                    .client(10, format_args!("event handler {}", name.sym));
            }
        }
        node.visit_children_with(self);
    }
}
