// Jar inspection: plugin descriptors and server identification

use log::debug;
use serde::Deserialize;
use std::fs;
use std::io::{Read, Seek};
use std::path::Path;
use zip::ZipArchive;

#[derive(Debug, Deserialize)]
struct PluginYml {
    name: Option<String>,
    version: Option<serde_yaml::Value>,
}

/// Name and version declared in a plugin's plugin.yml (or bungee.yml / paper-plugin.yml)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginDescriptor {
    pub name: String,
    pub version: Option<String>,
}

/// What a server jar turned out to be
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServerIdentity {
    pub server: Option<String>,
    pub version: Option<String>,
    pub build: Option<String>,
}

impl ServerIdentity {
    fn is_complete(&self) -> bool {
        self.server.is_some() && self.version.is_some() && self.build.is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.server.is_none() && self.version.is_none() && self.build.is_none()
    }

    /// Fill fields that are still unknown from `other`
    fn merge(&mut self, other: ServerIdentity) {
        self.server = self.server.take().or(other.server);
        self.version = self.version.take().or(other.version);
        self.build = self.build.take().or(other.build);
    }
}

fn read_entry<R: Read + Seek>(archive: &mut ZipArchive<R>, name: &str) -> Option<String> {
    let mut entry = archive.by_name(name).ok()?;
    let mut contents = String::new();
    entry.read_to_string(&mut contents).ok()?;
    Some(contents)
}

/// Read the plugin descriptor from a plugin jar
pub fn read_plugin_descriptor(jar_path: &Path) -> anyhow::Result<PluginDescriptor> {
    let file = fs::File::open(jar_path)?;
    let mut archive = ZipArchive::new(file)?;

    let contents = ["plugin.yml", "paper-plugin.yml", "bungee.yml"]
        .iter()
        .find_map(|name| read_entry(&mut archive, name))
        .ok_or_else(|| anyhow::anyhow!("No plugin.yml found in {}", jar_path.display()))?;

    let plugin: PluginYml = serde_yaml::from_str(&contents)
        .map_err(|e| anyhow::anyhow!("Failed to parse plugin.yml: {}", e))?;

    let name = plugin
        .name
        .ok_or_else(|| anyhow::anyhow!("plugin.yml missing 'name' field"))?;

    // Versions like `1.0` parse as numbers in YAML
    let version = plugin.version.and_then(|v| match v {
        serde_yaml::Value::String(s) => Some(s),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        _ => None,
    });

    Ok(PluginDescriptor { name, version })
}

/// Identify the server software, Minecraft version and build of a server jar.
///
/// Looks at MANIFEST.MF, then the version.json bundled since 1.14, then the
/// filename, keeping the first answer found for each field.
pub fn identify_server(jar_path: &Path) -> anyhow::Result<ServerIdentity> {
    let file = fs::File::open(jar_path)
        .map_err(|e| anyhow::anyhow!("Cannot open {}: {}", jar_path.display(), e))?;
    let mut archive = ZipArchive::new(file)
        .map_err(|e| anyhow::anyhow!("{} is not a jar file: {}", jar_path.display(), e))?;

    let mut identity = ServerIdentity::default();

    if let Some(manifest) = read_entry(&mut archive, "META-INF/MANIFEST.MF") {
        debug!("Identifying {} from MANIFEST.MF", jar_path.display());
        identity.merge(identify_from_manifest(&manifest));
    }

    if !identity.is_complete() {
        if let Some(json) = read_entry(&mut archive, "version.json") {
            debug!("Identifying {} from version.json", jar_path.display());
            identity.merge(identify_from_version_json(&json));
        }
    }

    if !identity.is_complete() {
        if let Some(filename) = jar_path.file_name().and_then(|n| n.to_str()) {
            identity.merge(identify_from_filename(filename));
        }
    }

    if identity.is_empty() {
        anyhow::bail!("Could not identify {}", jar_path.display());
    }
    Ok(identity)
}

/// Parse the main section of a MANIFEST.MF into key/value pairs
fn manifest_attributes(contents: &str) -> Vec<(String, String)> {
    let mut attributes: Vec<(String, String)> = Vec::new();
    for line in contents.lines() {
        if line.is_empty() {
            break;
        }
        // Continuation lines start with a single space
        if let Some(rest) = line.strip_prefix(' ') {
            if let Some((_, value)) = attributes.last_mut() {
                value.push_str(rest);
            }
            continue;
        }
        if let Some((key, value)) = line.split_once(':') {
            attributes.push((key.trim().to_string(), value.trim().to_string()));
        }
    }
    attributes
}

fn server_from_main_class(main_class: &str) -> Option<&'static str> {
    const MAIN_CLASSES: &[(&str, &str)] = &[
        ("io.papermc.paperclip", "Paper"),
        ("com.destroystokyo.paperclip", "Paper"),
        ("org.bukkit.craftbukkit", "CraftBukkit"),
        ("net.md_5.bungee", "BungeeCord"),
        ("com.velocitypowered", "Velocity"),
        ("net.fabricmc", "Fabric"),
        ("net.minecraft", "Vanilla"),
    ];
    MAIN_CLASSES
        .iter()
        .find(|(prefix, _)| main_class.starts_with(prefix))
        .map(|(_, server)| *server)
}

fn identify_from_manifest(contents: &str) -> ServerIdentity {
    let attributes = manifest_attributes(contents);
    let get = |key: &str| {
        attributes
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
            .filter(|v| !v.is_empty())
    };

    let mut identity = ServerIdentity {
        server: get("Implementation-Title")
            .map(str::to_string)
            .or_else(|| get("Main-Class").and_then(server_from_main_class).map(str::to_string)),
        ..Default::default()
    };

    if let Some(implementation) = get("Implementation-Version") {
        identity.merge(parse_implementation_version(implementation));
    }
    if identity.version.is_none() {
        identity.version = get("Specification-Version").map(str::to_string);
    }
    identity
}

/// Parse Bukkit-style implementation versions:
/// - "git-Paper-196 (MC: 1.20.4)" -> Paper, 1.20.4, build 196
/// - "git-Spigot-79a30d7-f4830a1 (MC: 1.20.4)" -> Spigot, 1.20.4, build 79a30d7-f4830a1
/// - "1.20.4-496-7ff8d9d (MC: 1.20.4)" -> 1.20.4, build 496
fn parse_implementation_version(value: &str) -> ServerIdentity {
    let mut identity = ServerIdentity::default();

    let (head, mc) = match value.split_once("(MC:") {
        Some((head, rest)) => (head.trim(), Some(rest.trim_end_matches(')').trim())),
        None => (value.trim(), None),
    };
    identity.version = mc.filter(|v| !v.is_empty()).map(str::to_string);

    if let Some(rest) = head.strip_prefix("git-") {
        let mut parts = rest.splitn(2, '-');
        identity.server = parts.next().filter(|s| !s.is_empty()).map(str::to_string);
        identity.build = parts.next().filter(|s| !s.is_empty()).map(str::to_string);
    } else {
        let mut parts = head.split('-');
        let version = parts.next().filter(|v| v.starts_with(|c: char| c.is_ascii_digit()));
        if identity.version.is_none() {
            identity.version = version.map(str::to_string);
        }
        identity.build = parts
            .next()
            .filter(|b| b.chars().all(|c| c.is_ascii_digit()) && !b.is_empty())
            .map(str::to_string);
    }
    identity
}

#[derive(Debug, Deserialize)]
struct VersionJson {
    id: Option<String>,
    name: Option<String>,
}

fn identify_from_version_json(contents: &str) -> ServerIdentity {
    match serde_json::from_str::<VersionJson>(contents) {
        Ok(json) => ServerIdentity {
            server: None,
            version: json.id.or(json.name),
            build: None,
        },
        Err(e) => {
            debug!("Ignoring unparsable version.json: {}", e);
            ServerIdentity::default()
        }
    }
}

/// Identify from names like paper-1.20.4-496.jar, spigot-1.20.4.jar or minecraft_server.1.20.4.jar
fn identify_from_filename(filename: &str) -> ServerIdentity {
    let Some(name) = filename.strip_suffix(".jar") else {
        return ServerIdentity::default();
    };

    if let Some(version) = name.strip_prefix("minecraft_server.") {
        return ServerIdentity {
            server: Some("Vanilla".to_string()),
            version: Some(version.to_string()),
            build: None,
        };
    }

    let parts: Vec<&str> = name.split('-').collect();
    let is_version = |s: &str| s.starts_with(|c: char| c.is_ascii_digit()) && s.contains('.');

    let Some(version_index) = parts.iter().position(|p| is_version(p)) else {
        return ServerIdentity::default();
    };

    let server = parts[..version_index].join("-");
    let build = parts
        .get(version_index + 1)
        .filter(|b| b.chars().all(|c| c.is_ascii_digit()))
        .map(|b| b.to_string());

    ServerIdentity {
        server: (!server.is_empty()).then(|| capitalize(&server)),
        version: Some(parts[version_index].to_string()),
        build,
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
