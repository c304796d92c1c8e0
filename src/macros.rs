/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */

// Fetches a single object and hands it the client it came from
macro_rules! obj_from_url {
    ( $c:expr, $url:expr, $params:expr, $auth:expr, $rt:ty ) => {{
        $c.get::<$rt>($url, $params, $auth).await.map(|mut v| {
            v.client = Some($c.clone());
            v
        })
    }};
}

// Fetches a list of objects and hands each the client they came from
macro_rules! objs_from_url {
    ( $c:expr, $url:expr, $params:expr, $auth:expr, $rt:ty ) => {{
        $c.get::<Vec<$rt>>($url, $params, $auth).await.map(|v| {
            v.into_iter()
                .map(|mut v| {
                    v.client = Some($c.clone());
                    v
                })
                .collect::<Vec<$rt>>()
        })
    }};
}

// Sends a JSON update and hands the returned object the client it came from
macro_rules! obj_update_from_url {
    ( $c:expr, $url:expr, $data:expr, $rt:ty ) => {{
        $c.put::<_, $rt>($url, $data).await.map(|mut v| {
            v.client = Some($c.clone());
            v
        })
    }};
}

pub(crate) use {obj_from_url, obj_update_from_url, objs_from_url};
