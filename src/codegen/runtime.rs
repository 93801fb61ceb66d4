//! Bash support code emitted into every runnable script.

/// Error trapping, truthiness, RC loading, config accessors, list storage,
/// file helpers and struct packing. Emitted once, verbatim.
pub const RUNTIME_LIBRARY: &str = r##"__gnash_die() {
  trap - ERR
  printf 'error: %s\n' "$*" >&2
  exit 1
}

__gnash_warn() {
  printf 'warn: %s\n' "$*" >&2
}

__gnash_debug() {
  if [[ "${GNASH_DEBUG_CONFIG:-}" == "1" ]]; then
    printf 'debug: %s\n' "$*" >&2
  fi
}

# ERR trap: report status and location of the failing command.
__gnash_trap_err() {
  local rc=$?
  local line="${BASH_LINENO[0]:-?}"
  local src="${BASH_SOURCE[1]:-${BASH_SOURCE[0]}}"
  printf 'error: command failed (exit %s) at %s:%s\n' "$rc" "$src" "$line" >&2
}

trap '__gnash_trap_err' ERR

__gnash_bool_truthy() {
  local value="${1:-}"
  case "${value,,}" in
    1|y|yes|true|on) return 0 ;;
    0|n|no|false|off) return 1 ;;
    *) [[ -n "$value" ]] && return 0 || return 1 ;;
  esac
}

__gnash_bool_falsey() {
  if __gnash_bool_truthy "${1:-}"; then
    return 1
  fi
  return 0
}

__gnash_promote_assoc_locals() {
  local -n __gnash_seen_ref="$1"
  local __gnash_var=""
  while IFS= read -r __gnash_var; do
    [[ "$__gnash_var" == __gnash_* ]] && continue
    [[ "$__gnash_var" == BASH_* ]] && continue
    local __gnash_decl
    __gnash_decl=$(declare -p "$__gnash_var" 2>/dev/null) || continue
    [[ "$__gnash_decl" == "declare -A "* ]] || continue
    local __gnash_found=0
    for existing in "${__gnash_seen_ref[@]}"; do
      if [[ "$existing" == "$__gnash_var" ]]; then
        __gnash_found=1
        break
      fi
    done
    if (( !__gnash_found )); then
      __gnash_decl=${__gnash_decl/#declare -A /declare -gA }
      eval "$__gnash_decl"
      __gnash_seen_ref+=("$__gnash_var")
    fi
  done < <(compgen -A variable)
}

__gnash_load_rc() {
  if [[ "${GNASH_NO_RC:-0}" == "1" ]]; then
    return
  fi

  local -a __gnash_assoc_seen=()
  local __gnash_existing=""
  while IFS= read -r __gnash_existing; do
    local __gnash_decl
    __gnash_decl=$(declare -p "$__gnash_existing" 2>/dev/null) || continue
    [[ "$__gnash_decl" == "declare -A "* ]] || continue
    __gnash_assoc_seen+=("$__gnash_existing")
  done < <(compgen -A variable)

  local override="${GNASH_RC_OVERRIDE:-${GNASH_RC:-}}"
  if [[ -n "$override" ]]; then
    if [[ -r "$override" ]]; then
      # shellcheck disable=SC1090
      source "$override"
      __gnash_promote_assoc_locals __gnash_assoc_seen
    else
      __gnash_die "RC override '$override' not readable"
    fi
    return
  fi

  local candidates=(
    "./.gnashrc"
    "${HOME:-}/.gnashrc"
    "/etc/gnashrc"
  )
  local rc=
  for candidate in "${candidates[@]}"; do
    if [[ -r "$candidate" ]]; then
      rc="$candidate"
      break
    fi
  done

  if [[ -n "$rc" ]]; then
    # shellcheck disable=SC1090
    source "$rc"
    __gnash_promote_assoc_locals __gnash_assoc_seen
  fi
}

__gnash_config_step_enabled() {
  local key="$1"
  local var="${key}_enabled"
  local value="${!var:-}"
  if [[ -z "$value" ]]; then
    return 0
  fi
  __gnash_bool_truthy "$value"
}

__gnash_config_step_value() {
  local key="$1"
  local field="$2"
  local assoc="${key}"
  if declare -p "$assoc" &>/dev/null; then
    # shellcheck disable=SC2178
    local -n ref="$assoc"
    printf '%s' "${ref[$field]:-}"
    return
  fi
  local var="${key}_${field}"
  printf '%s' "${!var:-}"
}

__gnash_config_step_list() {
  local __gnash_out_var=""
  local key
  local field
  if (( $# == 3 )); then
    __gnash_out_var="$1"
    key="$2"
    field="$3"
  else
    key="$1"
    field="$2"
  fi
  local array_name="${key}_${field}"
  local __gnash_tmp_list=""
  local __gnash_decl=""
  __gnash_decl=$(declare -p "$array_name" 2>/dev/null) || __gnash_decl=""
  if [[ "$__gnash_decl" == "declare -a"* ]]; then
    __gnash_list_from_array __gnash_tmp_list "$array_name"
  else
    local value="$(__gnash_config_step_value "$key" "$field")"
    if [[ -z "$value" ]]; then
      __gnash_list_empty __gnash_tmp_list
    else
      local -a __tmp_values=()
      IFS=',' read -r -a __tmp_values <<<"$value"
      __gnash_list_from_array __gnash_tmp_list __tmp_values
    fi
  fi
  if [[ -n "$__gnash_out_var" ]]; then
    printf -v "$__gnash_out_var" '%s' "${__gnash_tmp_list}"
  else
    printf '%s' "${__gnash_tmp_list}"
  fi
}

__GNASH_LIST_PREFIX="__gnash_list::"
__GNASH_LIST_DIR=""
__GNASH_LIST_CLEANUP_REGISTERED=0

__gnash_list_cleanup() {
  if [[ -n "$__GNASH_LIST_DIR" && -d "$__GNASH_LIST_DIR" ]]; then
    rm -rf "$__GNASH_LIST_DIR"
  fi
}

__gnash_list_init() {
  if [[ -n "$__GNASH_LIST_DIR" ]]; then
    return
  fi
  local dir
  dir=$(mktemp -d "${TMPDIR:-/tmp}/gnash-list-XXXXXX") || __gnash_die "unable to allocate list storage"
  __GNASH_LIST_DIR="$dir"
  if (( BASH_SUBSHELL == 0 )) && (( !__GNASH_LIST_CLEANUP_REGISTERED )); then
    trap '__gnash_list_cleanup' EXIT
    __GNASH_LIST_CLEANUP_REGISTERED=1
  fi
}

__gnash_is_list() {
  local token="${1:-}"
  [[ "$token" == "$__GNASH_LIST_PREFIX"* ]]
}

__gnash_list_name() {
  local token="${1:-}"
  if ! __gnash_is_list "$token"; then
    return 1
  fi
  printf '%s' "${token#$__GNASH_LIST_PREFIX}"
}

__gnash_list_path() {
  local token="$1"
  printf '%s' "${token#$__GNASH_LIST_PREFIX}"
}

__gnash_list_alloc() {
  __gnash_list_init
  local path
  path=$(mktemp "${__GNASH_LIST_DIR}/list.XXXXXX") || __gnash_die "unable to create list buffer"
  printf '%s%s' "$__GNASH_LIST_PREFIX" "$path"
}

__gnash_list_write() {
  local token="$1"
  shift
  local path
  path=$(__gnash_list_path "$token")
  : >"$path"
  local item
  for item in "$@"; do
    printf '%s\0' "$item" >>"$path"
  done
}

__gnash_list_read() {
  local token="$1"
  local dest="$2"
  local path
  path=$(__gnash_list_path "$token")
  local -n out_ref="$dest"
  out_ref=()
  if [[ ! -f "$path" ]]; then
    return
  fi
  local __gnash_item
  while IFS= read -r -d '' __gnash_item; do
    out_ref+=("$__gnash_item")
  done <"$path"
}

__gnash_list_from_array() {
  local dest="$1"
  local src_name="$2"
  local token
  token=$(__gnash_list_alloc)
  local -n src_ref="$src_name"
  __gnash_list_write "$token" "${src_ref[@]}"
  printf -v "$dest" '%s' "$token"
}

__gnash_list_from_value() {
  local dest="$1"
  local value="${2:-}"
  local token
  token=$(__gnash_list_alloc)
  if __gnash_is_list "$value"; then
    local -a __gnash_tmp_values=()
    __gnash_list_read "$value" "__gnash_tmp_values"
    __gnash_list_write "$token" "${__gnash_tmp_values[@]}"
  elif [[ -z "$value" ]]; then
    __gnash_list_write "$token"
  elif [[ "$value" == *$'\n'* ]]; then
    local -a __gnash_tmp_split=()
    IFS=$'\n' read -r -a __gnash_tmp_split <<<"$value"
    __gnash_list_write "$token" "${__gnash_tmp_split[@]}"
  else
    __gnash_list_write "$token" "$value"
  fi
  printf -v "$dest" '%s' "$token"
}

__gnash_list_to_array() {
  local dest="$1"
  local token="${2:-}"
  local -n out_ref="$dest"
  out_ref=()
  if __gnash_is_list "$token"; then
    __gnash_list_read "$token" "$dest"
    return 0
  fi
  if [[ -z "$token" ]]; then
    return 0
  fi
  if [[ "$token" == *$'\n'* ]]; then
    IFS=$'\n' read -r -a out_ref <<<"$token"
  else
    out_ref=("$token")
  fi
}

__gnash_list_empty() {
  local token
  token=$(__gnash_list_alloc)
  __gnash_list_write "$token"
  if (( $# >= 1 )); then
    printf -v "$1" '%s' "$token"
    return
  fi
  printf '%s' "$token"
}

__gnash_list_from_values() {
  local token
  token=$(__gnash_list_alloc)
  __gnash_list_write "$token" "$@"
  printf '%s' "$token"
}

__gnash_list_append() {
  local token="${1:-}"
  local value="${2:-}"
  local -a __gnash_items=()
  __gnash_list_read "$token" "__gnash_items"
  __gnash_items+=("$value")
  __gnash_list_write "$token" "${__gnash_items[@]}"
}

__gnash_list_contains() {
  local token="${1:-}"
  local needle="${2:-}"
  if __gnash_is_list "$token"; then
    local -a __gnash_items=()
    __gnash_list_read "$token" "__gnash_items"
    local item
    for item in "${__gnash_items[@]}"; do
      if [[ "$item" == "$needle" ]]; then
        return 0
      fi
    done
    return 1
  fi
  [[ "$token" == "$needle" ]] || return 1
}

__gnash_list_contains_value() {
  if __gnash_list_contains "$1" "$2"; then
    printf 'true'
  else
    printf 'false'
  fi
}

__gnash_file_exists() {
  local path="$1"
  [[ -e "$path" ]]
}

# Copies an existing file to <path>.bak.<epoch>.
__gnash_backup_file() {
  local path="$1"
  if ! __gnash_file_exists "$path"; then
    return
  fi
  local ts
  ts=$(date +%s)
  cp "$path" "${path}.bak.${ts}"
}

__gnash_write_file() {
  local path="$1"
  local content="$2"
  printf '%s' "$content" >"$path"
}

# Status 1 when the file already holds <content>; otherwise backup, write, chmod, status 0.
__gnash_ensure_file_content() {
  local path="$1"
  local expected="$2"
  local mode="$3"
  if __gnash_file_exists "$path"; then
    local current
    current=$(cat "$path")
    if [[ "$current" == "$expected" ]]; then
      return 1
    fi
  fi
  __gnash_backup_file "$path"
  __gnash_write_file "$path" "$expected"
  chmod "$mode" "$path"
  return 0
}

# a,b,c -> one item per line.
__gnash_split_csv() {
  local value="$1"
  if [[ -z "$value" ]]; then
    return
  fi
  IFS=',' read -r -a _GNASH_TMP_VALUES <<<"$value"
  printf '%s\n' "${_GNASH_TMP_VALUES[@]}"
}

# key value ... -> one key=raw:value or key=b64:value line per pair.
# b64 is used only for values containing a newline.
__gnash_struct_pack() {
  if (( $# % 2 != 0 )); then
    __gnash_die "__gnash_struct_pack requires key/value pairs"
  fi
  while (( $# > 0 )); do
    local key="$1"
    local value="$2"
    shift 2
    local encoding="raw"
    if [[ "$value" == *$'\n'* ]]; then
      encoding="b64"
      value=$(printf '%s' "$value" | base64 | tr -d '\n')
    else
      value=$(printf '%s' "$value")
    fi
    printf '%s=%s:%s\n' "$key" "$encoding" "$value"
  done
}

# Status 1 when <key> is absent.
__gnash_struct_get() {
  local struct="$1"
  local key="$2"
  local line
  while IFS= read -r line; do
    if [[ "${line%%=*}" == "$key" ]]; then
      local rest="${line#*=}"
      local encoding="${rest%%:*}"
      local data="${rest#*:}"
      if [[ "$encoding" == "b64" ]]; then
        printf '%s' "$data" | base64 --decode
      else
        printf '%s' "$data"
      fi
      return 0
    fi
  done <<<"$struct"
  return 1
}

# struct_get into variable <dest>; trailing newlines in the value are kept.
__gnash_struct_get_into() {
  local __gnash_dest="$1"
  local __gnash_field=""
  local __gnash_rc=0
  __gnash_field=$(__gnash_struct_get "$2" "$3" && printf x) || __gnash_rc=$?
  printf -v "$__gnash_dest" '%s' "${__gnash_field%x}"
  return $__gnash_rc
}
"##;

/// Fallback dispatchers, defined only when the environment has not already
/// provided them. `a.b` dispatches to `gnash_fn_a_b`; `__gnash_call` prints
/// the callee's string result and preserves its status.
pub const DISPATCH_STUBS: &str = r##"if ! command -v __gnash_invoke >/dev/null 2>&1; then
  __gnash_invoke() {
    local target="$1"
    shift
    local fn="gnash_fn_${target//./_}"
    if ! command -v "$fn" >/dev/null 2>&1; then
      __gnash_warn "invoke stub: $target"
      return 1
    fi
    "$fn" "" "$@"
  }
fi

if ! command -v __gnash_call >/dev/null 2>&1; then
  __gnash_call() {
    local target="$1"
    shift
    local fn="gnash_fn_${target//./_}"
    if ! command -v "$fn" >/dev/null 2>&1; then
      __gnash_warn "call stub: $target"
      return 1
    fi
    local __gnash_result=""
    local rc=0
    "$fn" __gnash_result "$@" || rc=$?
    printf '%s\n' "${__gnash_result}"
    return $rc
  }
fi

"##;
