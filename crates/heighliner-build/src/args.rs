use crate::options::BuildOptions;

/// heighliner のサブコマンド
pub const SUBCOMMAND: &str = "build";

/// BuildOptions を heighliner の引数列に変換
///
/// フラグの順序は固定: chain → file → local → org → registry → tag →
/// use-buildkit → platform。値のないキーと false のフラグは出力しない。
pub fn build_arguments(opts: &BuildOptions) -> Vec<String> {
    let mut args = vec![SUBCOMMAND.to_string()];

    push_value(&mut args, "--chain", opts.chain.as_deref());
    push_value(&mut args, "--file", opts.chains_spec_file.as_deref());
    push_flag(&mut args, "--local", opts.local);
    push_value(&mut args, "--org", opts.org.as_deref());
    push_value(&mut args, "--registry", opts.registry.as_deref());
    push_value(&mut args, "--tag", opts.tag.as_deref());
    push_flag(&mut args, "--use-buildkit", opts.buildkit);
    push_value(&mut args, "--platform", opts.platform.as_deref());

    args
}

fn push_value(args: &mut Vec<String>, flag: &str, value: Option<&str>) {
    if let Some(value) = value.filter(|v| !v.is_empty()) {
        args.push(flag.to_string());
        args.push(value.to_string());
    }
}

fn push_flag(args: &mut Vec<String>, flag: &str, enabled: bool) {
    if enabled {
        args.push(flag.to_string());
    }
}
